//! # Book Identifiers: BookId vs Display Index
//!
//! Books are identified internally by [`BookId`], an opaque UUID. That is the
//! right key for the catalog but useless at a prompt, so the CLI addresses
//! books by where they sit in the catalog instead.
//!
//! ## Display Indexes
//!
//! - `f1`, `f2`, ...: rows of the favorites section (section 0)
//! - `2.1`, `2.2`, ...: rows of tag section 2
//!
//! Sections keep the catalog's positions (favorites is 0, tags start at 1)
//! and rows are 1-based. Because a book appears once per tag and once more in
//! favorites, the same book can have several display indexes. They all
//! resolve to the same [`BookId`].
//!
//! ## Selectors
//!
//! A [`BookSelector`] is either an index or a title search. Anything that does
//! not parse as an index is treated as a case-insensitive title substring.
//!
//! ## Implementation
//!
//! - [`index_catalog`]: Builds the indexed view of every section
//! - [`resolve_selector`]: Maps a selector to the matching books

use crate::catalog::{Catalog, FAVORITES_SECTION};
use crate::model::{Book, BookId};
use crate::tag::Tag;
use std::str::FromStr;

/// A user-facing index for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayIndex {
    Favorite(usize),
    Tagged { section: usize, row: usize },
}

impl DisplayIndex {
    /// Catalog position and 0-based row.
    pub fn locate(&self) -> (usize, usize) {
        match *self {
            DisplayIndex::Favorite(row) => (FAVORITES_SECTION, row.saturating_sub(1)),
            DisplayIndex::Tagged { section, row } => (section, row.saturating_sub(1)),
        }
    }

    /// Index for a catalog position and 0-based row.
    pub fn at(section: usize, row: usize) -> Self {
        if section == FAVORITES_SECTION {
            DisplayIndex::Favorite(row + 1)
        } else {
            DisplayIndex::Tagged {
                section,
                row: row + 1,
            }
        }
    }
}

impl std::fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayIndex::Favorite(row) => write!(f, "f{}", row),
            DisplayIndex::Tagged { section, row } => write!(f, "{}.{}", section, row),
        }
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(['f', 'F']) {
            if let Ok(row) = rest.parse::<usize>() {
                if row > 0 {
                    return Ok(DisplayIndex::Favorite(row));
                }
            }
        } else if let Some((section, row)) = s.split_once('.') {
            if let (Ok(section), Ok(row)) = (section.parse::<usize>(), row.parse::<usize>()) {
                if row > 0 && section != FAVORITES_SECTION {
                    return Ok(DisplayIndex::Tagged { section, row });
                }
            }
        }
        Err(format!("Invalid book index: {}", s))
    }
}

/// A user input to select books, either by index or by a title search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSelector {
    Index(DisplayIndex),
    Title(String),
}

impl std::fmt::Display for BookSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookSelector::Index(idx) => write!(f, "{}", idx),
            BookSelector::Title(t) => write!(f, "\"{}\"", t),
        }
    }
}

/// Parses CLI inputs. When every input is an index each becomes its own
/// selector; otherwise the words are joined into a single title search.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Vec<BookSelector> {
    let all_indexes: Result<Vec<DisplayIndex>, _> = inputs
        .iter()
        .map(|s| DisplayIndex::from_str(s.as_ref()))
        .collect();

    if let Ok(indexes) = all_indexes {
        return indexes.into_iter().map(BookSelector::Index).collect();
    }

    let search_term = inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");

    vec![BookSelector::Title(search_term)]
}

/// A book together with the index it is shown under.
#[derive(Debug, Clone)]
pub struct DisplayBook {
    pub book: Book,
    pub index: DisplayIndex,
}

#[derive(Debug, Clone)]
pub struct DisplaySection {
    pub position: usize,
    pub tag: Tag,
    pub books: Vec<DisplayBook>,
}

/// Indexes every section of the catalog, in section order.
pub fn index_catalog(catalog: &Catalog) -> Vec<DisplaySection> {
    catalog
        .sections()
        .map(|(position, tag, books)| index_section(position, tag, &books))
        .collect()
}

pub fn index_section(position: usize, tag: &Tag, books: &[&Book]) -> DisplaySection {
    DisplaySection {
        position,
        tag: tag.clone(),
        books: books
            .iter()
            .enumerate()
            .map(|(row, book)| DisplayBook {
                book: (*book).clone(),
                index: DisplayIndex::at(position, row),
            })
            .collect(),
    }
}

/// Books matching a selector, each under the index it was found at.
///
/// Title searches return every book whose title contains the term
/// (case-insensitive), once each, under its first index.
pub fn resolve_selector(catalog: &Catalog, selector: &BookSelector) -> Vec<(DisplayIndex, BookId)> {
    match selector {
        BookSelector::Index(idx) => {
            let (section, row) = idx.locate();
            catalog
                .book_at(row, section)
                .map(|book| vec![(*idx, book.id())])
                .unwrap_or_default()
        }
        BookSelector::Title(term) => {
            let needle = term.to_lowercase();
            let mut found: Vec<(DisplayIndex, BookId)> = Vec::new();
            for (position, _, books) in catalog.sections() {
                for (row, book) in books.iter().enumerate() {
                    let already = found.iter().any(|(_, id)| *id == book.id());
                    if !already && book.title().to_lowercase().contains(&needle) {
                        found.push((DisplayIndex::at(position, row), book.id()));
                    }
                }
            }
            found
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{book, favorite};

    fn catalog() -> Catalog {
        Catalog::build(vec![
            book("Zeta", &["algo"]),
            favorite("Alpha", &["algo", "php"]),
        ])
    }

    #[test]
    fn parses_and_prints_indexes() {
        assert_eq!("f2".parse::<DisplayIndex>(), Ok(DisplayIndex::Favorite(2)));
        assert_eq!(
            "3.1".parse::<DisplayIndex>(),
            Ok(DisplayIndex::Tagged { section: 3, row: 1 })
        );
        assert_eq!(DisplayIndex::Favorite(1).to_string(), "f1");
        assert_eq!(DisplayIndex::Tagged { section: 2, row: 4 }.to_string(), "2.4");
    }

    #[test]
    fn rejects_malformed_indexes() {
        for bad in ["f0", "0.1", "1.0", "x1", "1", "1.2.3", "f", ""] {
            assert!(bad.parse::<DisplayIndex>().is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn parse_selectors_falls_back_to_title() {
        assert_eq!(
            parse_selectors(&["f1", "1.2"]),
            vec![
                BookSelector::Index(DisplayIndex::Favorite(1)),
                BookSelector::Index(DisplayIndex::Tagged { section: 1, row: 2 }),
            ]
        );
        assert_eq!(
            parse_selectors(&["pro", "git"]),
            vec![BookSelector::Title("pro git".into())]
        );
    }

    #[test]
    fn indexes_follow_catalog_positions() {
        let sections = index_catalog(&catalog());
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].books[0].index, DisplayIndex::Favorite(1));
        assert_eq!(sections[0].books[0].book.title(), "Alpha");
        assert_eq!(
            sections[1].books[1].index,
            DisplayIndex::Tagged { section: 1, row: 2 }
        );
        assert_eq!(sections[1].books[1].book.title(), "Zeta");
    }

    #[test]
    fn every_index_of_a_book_resolves_to_the_same_id() {
        let catalog = catalog();
        let ids: Vec<BookId> = ["f1", "1.1", "2.1"]
            .iter()
            .flat_map(|s| resolve_selector(&catalog, &BookSelector::Index(s.parse().unwrap())))
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[test]
    fn title_search_returns_each_book_once() {
        let catalog = catalog();
        let found = resolve_selector(&catalog, &BookSelector::Title("ALPH".into()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, DisplayIndex::Favorite(1));
    }

    #[test]
    fn out_of_range_index_resolves_to_nothing() {
        let catalog = catalog();
        let sel = BookSelector::Index(DisplayIndex::Tagged { section: 9, row: 1 });
        assert!(resolve_selector(&catalog, &sel).is_empty());
    }
}
