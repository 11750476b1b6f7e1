pub mod books;

pub use books::{AddCommentRequest, BookResponse, BookSummary, CreateBookRequest};
