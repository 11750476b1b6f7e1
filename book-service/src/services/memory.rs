use super::store::{parse_book_id, BookStore};
use super::BookError;
use crate::models::{Book, NewBook, NewComment};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local book store for tests and database-less runs.
///
/// Clones share the same collection. ObjectIds sort by creation time, so
/// listing returns books in insertion order like a fresh Mongo collection.
#[derive(Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<BTreeMap<ObjectId, Book>>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn create_book(&self, title: &str) -> Result<Book, BookError> {
        let book = Book::new(NewBook {
            title: title.to_string(),
        })?;
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_book_by_id(&self, id: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        self.books
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookError::NotFound)
    }

    async fn append_comment(&self, id: &str, comment: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or(BookError::NotFound)?;
        book.push_comment(NewComment {
            comment: comment.to_string(),
        })?;
        Ok(book.clone())
    }

    async fn delete_all_books(&self) -> Result<u64, BookError> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }

    async fn delete_book_by_id(&self, id: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        self.books
            .write()
            .await
            .remove(&id)
            .ok_or(BookError::NotFound)
    }

    async fn health_check(&self) -> Result<(), BookError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_list_returns_the_book() {
        let store = InMemoryBookStore::new();
        let created = store.create_book("test").await.unwrap();

        let books = store.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, created.id);
        assert_eq!(books[0].title, "test");
        assert_eq!(books[0].comment_count, 0);
    }

    #[tokio::test]
    async fn empty_title_is_rejected_and_not_persisted() {
        let store = InMemoryBookStore::new();
        let err = store.create_book("").await.unwrap_err();

        assert!(matches!(err, BookError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = InMemoryBookStore::new();
        for title in ["one", "two", "three"] {
            store.create_book(title).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn repeated_appends_track_count_and_order() {
        let store = InMemoryBookStore::new();
        let book = store.create_book("test").await.unwrap();
        let id = book.id.to_hex();

        let mut last = book;
        for i in 0..5 {
            last = store
                .append_comment(&id, &format!("comment {}", i))
                .await
                .unwrap();
        }

        assert_eq!(last.comment_count, 5);
        assert_eq!(last.comments.len(), 5);
        assert_eq!(last.comments.last().map(String::as_str), Some("comment 4"));
        assert_eq!(store.find_book_by_id(&id).await.unwrap(), last);
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_lose_updates() {
        let store = InMemoryBookStore::new();
        let id = store.create_book("busy").await.unwrap().id.to_hex();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                let id = id.clone();
                tokio::spawn(async move { store.append_comment(&id, &i.to_string()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let book = store.find_book_by_id(&id).await.unwrap();
        assert_eq!(book.comment_count, 50);
        assert_eq!(book.comments.len(), 50);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let store = InMemoryBookStore::new();
        let fresh = ObjectId::new().to_hex();

        for id in [fresh.as_str(), "not-an-id"] {
            assert!(matches!(
                store.find_book_by_id(id).await,
                Err(BookError::NotFound)
            ));
            assert!(matches!(
                store.append_comment(id, "hi").await,
                Err(BookError::NotFound)
            ));
            assert!(matches!(
                store.delete_book_by_id(id).await,
                Err(BookError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn delete_by_id_returns_removed_book() {
        let store = InMemoryBookStore::new();
        let keep = store.create_book("keep").await.unwrap();
        let gone = store.create_book("gone").await.unwrap();

        let removed = store.delete_book_by_id(&gone.id.to_hex()).await.unwrap();
        assert_eq!(removed.id, gone.id);

        let books = store.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, keep.id);
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let store = InMemoryBookStore::new();
        store.create_book("a").await.unwrap();
        store.create_book("b").await.unwrap();

        assert_eq!(store.delete_all_books().await.unwrap(), 2);
        assert!(store.list_books().await.unwrap().is_empty());
    }
}
