//! # Domain Model: Books
//!
//! A [`Book`] is created once from a decoded record and then lives inside a
//! [`crate::catalog::Catalog`] for the rest of the session.
//!
//! ## Two Notions of Sameness
//!
//! Books have two independent keys and they must not be confused:
//!
//! - **Title**: the sort key. `Ord`/`Eq` on `Book` compare titles only, so two
//!   different books with the same title compare equal. Sections are sorted
//!   with a stable sort, which keeps same-titled books in input order.
//! - **[`BookId`]**: the identity. A v4 UUID assigned at creation time. Anything
//!   that needs "this particular book" (removing it from favorites, caching
//!   its media) goes through the id, never through `==`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(Uuid);

impl BookId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two remote resources every book points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Cover,
    Document,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Cover => write!(f, "cover"),
            MediaKind::Document => write!(f, "pdf"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Book {
    id: BookId,
    title: String,
    authors: Vec<String>,
    tags: Vec<Tag>,
    cover: Url,
    document: Url,
    is_favorite: bool,
}

impl Book {
    /// Creates a non-favorite book. Repeated tags (by normalized name) are
    /// collapsed, keeping the first spelling.
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        tags: Vec<Tag>,
        cover: Url,
        document: Url,
    ) -> Self {
        let mut unique_tags: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique_tags.contains(&tag) {
                unique_tags.push(tag);
            }
        }

        Self {
            id: BookId::new(),
            title: title.into(),
            authors,
            tags: unique_tags,
            cover,
            document,
            is_favorite: false,
        }
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn cover(&self) -> &Url {
        &self.cover
    }

    pub fn document(&self) -> &Url {
        &self.document
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Flips the flag only. The favorites section of a catalog follows the
    /// flag once [`crate::catalog::Catalog::toggle_favorite`] is called.
    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.is_favorite = is_favorite;
    }

    pub fn location(&self, kind: MediaKind) -> &Url {
        match kind {
            MediaKind::Cover => &self.cover,
            MediaKind::Document => &self.document,
        }
    }

    pub(crate) fn set_location(&mut self, kind: MediaKind, location: Url) {
        match kind {
            MediaKind::Cover => self.cover = location,
            MediaKind::Document => self.document = location,
        }
    }

    /// Whether the resource already lives on this machine.
    pub fn is_local(&self, kind: MediaKind) -> bool {
        self.location(kind).scheme() == "file"
    }

    /// Last path segment of the resource location, used as the cache file name.
    pub fn file_name(&self, kind: MediaKind) -> Option<String> {
        self.location(kind)
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// "author1, author2, ..." (empty when there are no authors).
    pub fn authors_summary(&self) -> String {
        self.authors.join(", ")
    }

    /// "tag1, tag2, ..." (empty when there are no tags).
    pub fn tags_summary(&self) -> String {
        self.tags
            .iter()
            .map(Tag::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for Book {}

impl Ord for Book {
    fn cmp(&self, other: &Self) -> Ordering {
        self.title.cmp(&other.title)
    }
}

impl PartialOrd for Book {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' by {}. ({})",
            self.title,
            self.authors_summary(),
            self.tags_summary()
        )
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// A book with made-up remote locations derived from its title.
    pub fn book(title: &str, tags: &[&str]) -> Book {
        book_by(title, "Jane Doe", tags)
    }

    pub fn book_by(title: &str, author: &str, tags: &[&str]) -> Book {
        let slug: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Book::new(
            title,
            vec![author.to_string()],
            tags.iter().map(|t| Tag::new(*t)).collect(),
            Url::parse(&format!("https://books.example.com/covers/{}.jpg", slug)).unwrap(),
            Url::parse(&format!("https://books.example.com/pdf/{}.pdf", slug)).unwrap(),
        )
    }

    pub fn favorite(title: &str, tags: &[&str]) -> Book {
        book(title, tags).with_favorite(true)
    }
}
