use super::store::{parse_book_id, BookStore};
use super::BookError;
use crate::models::{Book, NewBook, NewComment};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use validator::Validate;

pub const BOOKS_COLLECTION: &str = "books";

#[derive(Clone)]
pub struct MongoBookStore {
    client: MongoClient,
    db: Database,
}

impl MongoBookStore {
    /// Build the client. The driver connects lazily, so this fails only on
    /// an unparsable connection string or, for `mongodb+srv://` URIs, when
    /// the SRV/TXT lookup fails.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, mongodb::error::Error> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            e
        })?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub fn books(&self) -> Collection<Book> {
        self.db.collection(BOOKS_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn create_book(&self, title: &str) -> Result<Book, BookError> {
        let book = Book::new(NewBook {
            title: title.to_string(),
        })?;

        self.books().insert_one(&book, None).await.map_err(|e| {
            tracing::error!("Failed to insert book: {}", e);
            BookError::from(e)
        })?;

        Ok(book)
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        let cursor = self.books().find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to list books: {}", e);
            BookError::from(e)
        })?;

        let books: Vec<Book> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect books: {}", e);
            BookError::from(e)
        })?;

        Ok(books)
    }

    async fn find_book_by_id(&self, id: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        self.books()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find book: {}", e);
                BookError::from(e)
            })?
            .ok_or(BookError::NotFound)
    }

    async fn append_comment(&self, id: &str, comment: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        NewComment {
            comment: comment.to_string(),
        }
        .validate()?;

        // Increment and push in one update so concurrent appends cannot
        // lose a comment or a count.
        let update = doc! {
            "$inc": { "commentCount": 1 },
            "$push": { "comments": comment },
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.books()
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to append comment: {}", e);
                BookError::from(e)
            })?
            .ok_or(BookError::NotFound)
    }

    async fn delete_all_books(&self) -> Result<u64, BookError> {
        let result = self.books().delete_many(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to delete books: {}", e);
            BookError::from(e)
        })?;

        Ok(result.deleted_count)
    }

    async fn delete_book_by_id(&self, id: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;
        self.books()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete book: {}", e);
                BookError::from(e)
            })?
            .ok_or(BookError::NotFound)
    }

    async fn health_check(&self) -> Result<(), BookError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                BookError::from(e)
            })?;
        Ok(())
    }
}
