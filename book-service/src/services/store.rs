use super::BookError;
use crate::models::Book;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Storage access for books.
///
/// Every call is a direct round trip to the backing store; nothing is cached.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book with no comments. Rejects an empty title.
    async fn create_book(&self, title: &str) -> Result<Book, BookError>;

    /// All books, in the store's natural order.
    async fn list_books(&self) -> Result<Vec<Book>, BookError>;

    async fn find_book_by_id(&self, id: &str) -> Result<Book, BookError>;

    /// Atomically bump `commentCount` and append `comment`, returning the
    /// updated book.
    async fn append_comment(&self, id: &str, comment: &str) -> Result<Book, BookError>;

    /// Remove every book. Returns how many were removed.
    async fn delete_all_books(&self) -> Result<u64, BookError>;

    /// Remove one book and return it.
    async fn delete_book_by_id(&self, id: &str) -> Result<Book, BookError>;

    async fn health_check(&self) -> Result<(), BookError>;
}

/// Parse a path identifier. Anything that is not an ObjectId can never
/// match a stored book.
pub fn parse_book_id(id: &str) -> Result<ObjectId, BookError> {
    ObjectId::parse_str(id).map_err(|_| BookError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_book_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_parse_malformed_id_is_not_found() {
        for raw in ["", "nope", "5f1d7f0e-1b2c-4c3d-8e9f-0a1b2c3d4e5f"] {
            assert!(matches!(parse_book_id(raw), Err(BookError::NotFound)));
        }
    }
}
