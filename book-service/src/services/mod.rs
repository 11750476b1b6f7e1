pub mod database;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod store;
pub mod unavailable;

pub use database::MongoBookStore;
pub use error::BookError;
pub use memory::InMemoryBookStore;
pub use self::metrics::{get_metrics, init_metrics, record_book_operation};
pub use store::{parse_book_id, BookStore};
pub use unavailable::UnavailableBookStore;
