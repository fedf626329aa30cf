//! # Tags
//!
//! A [`Tag`] is the category label books are grouped by. Tags are values: two
//! tags are the same tag when their names match after lower-casing, and they
//! sort by that lower-cased name.
//!
//! ## The Favorites Tag
//!
//! The catalog always has a "My Favorites" section at position 0. It is not
//! derived from book tag lists, so it is modelled as its own variant,
//! [`Tag::Favorites`], rather than as a label that happens to have a special
//! name. This keeps the sentinel from colliding with a book that is literally
//! tagged "my favorites": such a book gets an ordinary section like any other
//! label, and the catalog warns about it at construction time.
//!
//! Favorites sorts before every label.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Display name of the favorites section.
pub const FAVORITES_NAME: &str = "My Favorites";

#[derive(Debug, Clone)]
pub enum Tag {
    Favorites,
    Label(String),
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag::Label(name.into())
    }

    pub fn favorites() -> Self {
        Tag::Favorites
    }

    pub fn is_favorites(&self) -> bool {
        matches!(self, Tag::Favorites)
    }

    /// The name as it was given (or [`FAVORITES_NAME`]).
    pub fn name(&self) -> &str {
        match self {
            Tag::Favorites => FAVORITES_NAME,
            Tag::Label(name) => name,
        }
    }

    /// The comparison key: the lower-cased name.
    pub fn normalized(&self) -> String {
        normalize_tag_name(self.name())
    }

    /// True when this is a label whose normalized name equals the favorites
    /// section's name.
    pub fn shadows_favorites(&self) -> bool {
        match self {
            Tag::Favorites => false,
            Tag::Label(name) => normalize_tag_name(name) == normalize_tag_name(FAVORITES_NAME),
        }
    }
}

pub fn normalize_tag_name(name: &str) -> String {
    name.to_lowercase()
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tag::Favorites, Tag::Favorites) => true,
            (Tag::Label(a), Tag::Label(b)) => normalize_tag_name(a) == normalize_tag_name(b),
            _ => false,
        }
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Tag::Favorites => 0u8.hash(state),
            Tag::Label(name) => {
                1u8.hash(state);
                normalize_tag_name(name).hash(state);
            }
        }
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Tag::Favorites, Tag::Favorites) => Ordering::Equal,
            (Tag::Favorites, Tag::Label(_)) => Ordering::Less,
            (Tag::Label(_), Tag::Favorites) => Ordering::Greater,
            (Tag::Label(a), Tag::Label(b)) => normalize_tag_name(a).cmp(&normalize_tag_name(b)),
        }
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
