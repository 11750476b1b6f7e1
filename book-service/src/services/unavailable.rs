use super::store::BookStore;
use super::BookError;
use crate::models::Book;
use async_trait::async_trait;

/// Stand-in store used when no MongoDB client could be built at startup,
/// e.g. an SRV connection string whose DNS lookup failed.
///
/// Every operation reports a storage failure, so the routes answer with the
/// same storage-error responses they give when the database drops out later.
#[derive(Clone, Debug)]
pub struct UnavailableBookStore {
    reason: String,
}

impl UnavailableBookStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> BookError {
        BookError::Storage(anyhow::anyhow!("MongoDB unavailable: {}", self.reason))
    }
}

#[async_trait]
impl BookStore for UnavailableBookStore {
    async fn create_book(&self, _title: &str) -> Result<Book, BookError> {
        Err(self.error())
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        Err(self.error())
    }

    async fn find_book_by_id(&self, _id: &str) -> Result<Book, BookError> {
        Err(self.error())
    }

    async fn append_comment(&self, _id: &str, _comment: &str) -> Result<Book, BookError> {
        Err(self.error())
    }

    async fn delete_all_books(&self) -> Result<u64, BookError> {
        Err(self.error())
    }

    async fn delete_book_by_id(&self, _id: &str) -> Result<Book, BookError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), BookError> {
        Err(self.error())
    }
}
