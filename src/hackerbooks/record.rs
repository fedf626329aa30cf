//! # Book Records: the External Representation
//!
//! Book lists arrive and leave as JSON arrays of flat records:
//!
//! ```json
//! {
//!   "title": "Pro Git",
//!   "authors": "Scott Chacon, Ben Straub",
//!   "tags": "git, version control",
//!   "image_url": "https://example.com/progit.jpg",
//!   "pdf_url": "https://example.com/progit.pdf",
//!   "favorite": false
//! }
//! ```
//!
//! `authors` and `tags` are comma-separated. `favorite` is only present in
//! locally persisted lists; downloaded lists omit it and it reads as `false`.
//! Written records always carry it.
//!
//! ## Partial Failure
//!
//! Decoding works element by element. A record with a missing field, a wrong
//! type or an unparsable URL is skipped and reported in [`Decoded::skipped`];
//! the rest of the list still goes through.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{LibraryError, RecordError, Result};
use crate::model::Book;
use crate::tag::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub authors: String,
    pub tags: String,
    pub image_url: String,
    pub pdf_url: String,
    #[serde(default, deserialize_with = "favorite_flag")]
    pub favorite: bool,
}

// Anything other than a literal `true` counts as not favorite.
fn favorite_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::Bool(true)))
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title().to_string(),
            authors: book.authors_summary(),
            tags: book.tags_summary(),
            image_url: book.cover().to_string(),
            pdf_url: book.document().to_string(),
            favorite: book.is_favorite(),
        }
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = RecordError;

    fn try_from(record: BookRecord) -> std::result::Result<Self, Self::Error> {
        let cover = parse_location("image_url", &record.image_url)?;
        let document = parse_location("pdf_url", &record.pdf_url)?;
        let authors = split_list(&record.authors);
        let tags = split_list(&record.tags).into_iter().map(Tag::new).collect();

        Ok(Book::new(record.title, authors, tags, cover, document).with_favorite(record.favorite))
    }
}

fn parse_location(field: &'static str, value: &str) -> std::result::Result<Url, RecordError> {
    Url::parse(value.trim()).map_err(|_| RecordError::InvalidUri {
        field,
        value: value.to_string(),
    })
}

fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A record that could not be decoded, with its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub title: Option<String>,
    pub error: RecordError,
}

impl std::fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "record #{} ('{}'): {}", self.index, title, self.error),
            None => write!(f, "record #{}: {}", self.index, self.error),
        }
    }
}

#[derive(Debug, Default)]
pub struct Decoded {
    pub books: Vec<Book>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn decode_record(value: Value) -> std::result::Result<Book, RecordError> {
    let record: BookRecord =
        serde_json::from_value(value).map_err(|e| RecordError::Format(e.to_string()))?;
    Book::try_from(record)
}

/// Decodes every element it can, collecting the failures.
pub fn decode_records(values: Vec<Value>) -> Decoded {
    let mut decoded = Decoded::default();

    for (index, value) in values.into_iter().enumerate() {
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);

        match decode_record(value) {
            Ok(book) => {
                debug!(%book, "decoded book");
                decoded.books.push(book);
            }
            Err(error) => {
                let skipped = SkippedRecord {
                    index,
                    title,
                    error,
                };
                warn!(%skipped, "skipping malformed record");
                decoded.skipped.push(skipped);
            }
        }
    }

    decoded
}

/// Parses a JSON document that must be an array of records. Elements are
/// left undecoded so that one bad record cannot fail the whole list.
pub fn parse_record_list(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(values) => Ok(values),
        other => Err(LibraryError::Source(format!(
            "expected a JSON array of book records, found {}",
            json_kind(&other)
        ))),
    }
}

pub fn encode_records(records: &[BookRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
