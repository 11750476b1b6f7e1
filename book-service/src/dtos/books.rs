use crate::models::Book;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// Full book view, returned by create, get, and comment.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
    pub comments: Vec<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_hex(),
            title: book.title,
            comment_count: book.comment_count,
            comments: book.comments,
        }
    }
}

/// List view: comments are left out.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_hex(),
            title: book.title,
            comment_count: book.comment_count,
        }
    }
}

/// Reads a text field the way a loosely typed client sends it: numbers and
/// booleans become their string form, objects and arrays count as absent.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Other(IgnoredAny),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Int(n)) => Some(n.to_string()),
        Some(Scalar::Float(n)) => Some(n.to_string()),
        Some(Scalar::Bool(b)) => Some(b.to_string()),
        Some(Scalar::Other(_)) | None => None,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub title: Option<String>,
}

impl CreateBookRequest {
    /// The title, treating an empty value as absent.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub comment: Option<String>,
}

impl AddCommentRequest {
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}
