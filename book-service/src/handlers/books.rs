use crate::config::ErrorContract;
use crate::dtos::{AddCommentRequest, BookResponse, BookSummary, CreateBookRequest};
use crate::middleware::FormFields;
use crate::services::{record_book_operation, BookError};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use service_core::error::AppError;

pub const MISSING_TITLE: &str = "missing required field title";
pub const MISSING_COMMENT: &str = "missing required field comment";
pub const NO_BOOK: &str = "no book exists";
pub const DELETE_ALL_OK: &str = "complete delete successful";
pub const DELETE_OK: &str = "delete successful";

pub async fn list_books(State(state): State<AppState>) -> Response {
    let result = state.store.list_books().await;
    observe("list", &result);

    match result {
        Ok(books) => {
            let books: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
            Json(books).into_response()
        }
        Err(e) => collection_failure(state.contract(), e, "Error fetching books"),
    }
}

pub async fn create_book(
    State(state): State<AppState>,
    FormFields(form): FormFields<CreateBookRequest>,
) -> Response {
    let Some(title) = form.title() else {
        return missing_field(state.contract(), MISSING_TITLE);
    };

    let result = state.store.create_book(title).await;
    observe("create", &result);

    match result {
        Ok(book) => {
            tracing::info!(book_id = %book.id, "Book created");
            Json(BookResponse::from(book)).into_response()
        }
        Err(BookError::Validation(_)) => missing_field(state.contract(), MISSING_TITLE),
        Err(e) => collection_failure(state.contract(), e, "Error creating book"),
    }
}

pub async fn delete_all_books(State(state): State<AppState>) -> Response {
    let result = state.store.delete_all_books().await;
    observe("delete_all", &result);

    match result {
        Ok(removed) => {
            tracing::info!(removed, "All books deleted");
            (StatusCode::OK, DELETE_ALL_OK).into_response()
        }
        Err(e) => collection_failure(state.contract(), e, "Error deleting books"),
    }
}

pub async fn get_book(State(state): State<AppState>, Path(book_id): Path<String>) -> Response {
    let result = state.store.find_book_by_id(&book_id).await;
    observe("find", &result);

    match result {
        Ok(book) => Json(BookResponse::from(book)).into_response(),
        Err(e) => item_failure(state.contract(), &book_id, e),
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    FormFields(form): FormFields<AddCommentRequest>,
) -> Response {
    let Some(comment) = form.comment() else {
        return missing_field(state.contract(), MISSING_COMMENT);
    };

    let result = state.store.append_comment(&book_id, comment).await;
    observe("append_comment", &result);

    match result {
        Ok(book) => {
            tracing::info!(book_id = %book.id, comment_count = book.comment_count, "Comment added");
            Json(BookResponse::from(book)).into_response()
        }
        Err(BookError::Validation(_)) => missing_field(state.contract(), MISSING_COMMENT),
        Err(e) => item_failure(state.contract(), &book_id, e),
    }
}

pub async fn delete_book(State(state): State<AppState>, Path(book_id): Path<String>) -> Response {
    let result = state.store.delete_book_by_id(&book_id).await;
    observe("delete", &result);

    match result {
        Ok(book) => {
            tracing::info!(book_id = %book.id, "Book deleted");
            (StatusCode::OK, DELETE_OK).into_response()
        }
        Err(e) => item_failure(state.contract(), &book_id, e),
    }
}

fn observe<T>(operation: &'static str, result: &Result<T, BookError>) {
    match result {
        Ok(_) => record_book_operation(operation, "ok"),
        Err(e) => {
            record_book_operation(operation, e.outcome());
            match e {
                BookError::Storage(cause) => {
                    tracing::error!(operation, error = %cause, "Book storage operation failed")
                }
                _ => tracing::debug!(operation, outcome = e.outcome(), "Book operation rejected"),
            }
        }
    }
}

fn missing_field(contract: ErrorContract, message: &'static str) -> Response {
    match contract {
        ErrorContract::Legacy => (StatusCode::OK, message).into_response(),
        ErrorContract::Conventional => (StatusCode::BAD_REQUEST, message).into_response(),
    }
}

/// Failures on `/api/books`. Legacy clients get a 200 `{error}` body.
fn collection_failure(contract: ErrorContract, err: BookError, message: &'static str) -> Response {
    match contract {
        ErrorContract::Legacy => (StatusCode::OK, Json(json!({ "error": message }))).into_response(),
        ErrorContract::Conventional => AppError::from(err).into_response(),
    }
}

/// Failures on `/api/books/:id`. Legacy clients see every failure as a
/// missing book.
fn item_failure(contract: ErrorContract, book_id: &str, err: BookError) -> Response {
    if matches!(err, BookError::NotFound) {
        tracing::warn!(book_id = %book_id, "Book not found");
    }

    match (contract, err) {
        (ErrorContract::Legacy, _) => (StatusCode::OK, NO_BOOK).into_response(),
        (ErrorContract::Conventional, BookError::NotFound) => {
            (StatusCode::NOT_FOUND, NO_BOOK).into_response()
        }
        (ErrorContract::Conventional, err) => AppError::from(err).into_response(),
    }
}
