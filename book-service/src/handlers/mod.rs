pub mod books;
pub mod health;

pub use books::{add_comment, create_book, delete_all_books, delete_book, get_book, list_books};
pub use health::{health_check, metrics_endpoint, readiness_check};
