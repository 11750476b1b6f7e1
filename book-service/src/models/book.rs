use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Input for creating a book. The title is the only required field.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
}

/// A stored book, as laid out in the `books` collection.
///
/// `comment_count` is maintained alongside `comments` by the append
/// operation and is never recomputed from `comments.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(rename = "commentCount", default)]
    pub comment_count: i64,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Book {
    pub fn new(new_book: NewBook) -> Result<Self, ValidationErrors> {
        new_book.validate()?;
        Ok(Self {
            id: ObjectId::new(),
            title: new_book.title,
            comment_count: 0,
            comments: Vec::new(),
        })
    }

    pub fn push_comment(&mut self, comment: NewComment) -> Result<(), ValidationErrors> {
        comment.validate()?;
        self.comment_count += 1;
        self.comments.push(comment.comment);
        Ok(())
    }
}
