//! # The Catalog: Sectioned Book Index
//!
//! A [`Catalog`] turns a flat list of books into the ordered, sectioned
//! structure a table-style UI renders directly: one section per tag, plus a
//! synthetic favorites section.
//!
//! ## Section Ordering
//!
//! - Position 0 is always [`Tag::Favorites`], even when nothing is favorited.
//! - Positions 1..N hold every distinct tag found across the input books,
//!   lower-cased, in ascending alphabetical order, with no gaps.
//!
//! The tag set is computed once, at construction. The catalog is never grown
//! afterwards: the only mutations are favorite toggling and media relocation.
//!
//! ## Section Contents
//!
//! Each section lists the books carrying its tag (or, for favorites, the books
//! whose flag is set), sorted by title. The sort is stable: books sharing a
//! title keep their relative input order.
//!
//! A book with three tags appears in three sections, and once more in
//! favorites if it is one. This duplication is intentional. Books live once in
//! an internal arena and sections hold arena slots, so every appearance is the
//! same book.
//!
//! ## Lookups Are Total
//!
//! Every read accessor accepts any position, row or tag. Misses produce `0`,
//! an empty list or `None`; nothing here panics on bad input.
//!
//! ## Favorite Toggling Contract
//!
//! [`Catalog::toggle_favorite`] does **not** flip the flag. The caller flips it
//! first (through [`Catalog::book_mut`]) and the toggle then brings the
//! favorites section in line with it. [`Catalog::set_favorite`] does both
//! steps at once and is what the rest of the crate uses.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};
use url::Url;

use crate::model::{Book, BookId, MediaKind};
use crate::record::BookRecord;
use crate::tag::Tag;

/// Position of the favorites section.
pub const FAVORITES_SECTION: usize = 0;

#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    slots: HashMap<BookId, usize>,
    tags: Vec<Tag>,
    positions: HashMap<Tag, usize>,
    sections: Vec<Vec<usize>>,
}

impl Catalog {
    pub fn build(books: Vec<Book>) -> Self {
        let tags = section_tags(&books);
        let positions: HashMap<Tag, usize> = tags
            .iter()
            .enumerate()
            .map(|(position, tag)| (tag.clone(), position))
            .collect();

        let mut by_title: Vec<usize> = (0..books.len()).collect();
        by_title.sort_by(|&a, &b| by_title_then_slot(&books, a, b));

        let mut sections: Vec<Vec<usize>> = vec![Vec::new(); tags.len()];
        for slot in by_title {
            let book = &books[slot];
            for tag in book.tags() {
                match positions.get(tag) {
                    Some(&position) => sections[position].push(slot),
                    None => warn!(tag = %tag, book = %book.title(), "no section for tag"),
                }
            }
            if book.is_favorite() {
                sections[FAVORITES_SECTION].push(slot);
            }
        }

        let slots = books
            .iter()
            .enumerate()
            .map(|(slot, book)| (book.id(), slot))
            .collect();

        debug!(
            books = books.len(),
            sections = tags.len(),
            "catalog built"
        );

        Self {
            books,
            slots,
            tags,
            positions,
            sections,
        }
    }

    // --- Section index ---

    /// Number of sections, favorites included.
    pub fn section_count(&self) -> usize {
        self.tags.len()
    }

    pub fn tag_at(&self, position: usize) -> Option<&Tag> {
        self.tags.get(position)
    }

    pub fn section_of(&self, tag: &Tag) -> Option<usize> {
        self.positions.get(tag).copied()
    }

    /// Tags in section order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    // --- Section contents ---

    pub fn book_count(&self, position: usize) -> usize {
        self.sections.get(position).map_or(0, Vec::len)
    }

    pub fn book_count_for_tag(&self, tag: &Tag) -> usize {
        self.section_of(tag).map_or(0, |p| self.book_count(p))
    }

    pub fn books_in(&self, position: usize) -> Vec<&Book> {
        self.sections
            .get(position)
            .map(|slots| slots.iter().map(|&slot| &self.books[slot]).collect())
            .unwrap_or_default()
    }

    pub fn books_for_tag(&self, tag: &Tag) -> Vec<&Book> {
        self.section_of(tag)
            .map(|p| self.books_in(p))
            .unwrap_or_default()
    }

    pub fn book_at(&self, row: usize, position: usize) -> Option<&Book> {
        self.sections
            .get(position)
            .and_then(|slots| slots.get(row))
            .map(|&slot| &self.books[slot])
    }

    pub fn book_for_tag(&self, row: usize, tag: &Tag) -> Option<&Book> {
        self.section_of(tag).and_then(|p| self.book_at(row, p))
    }

    /// Row of a book within a section, if it appears there.
    pub fn row_of(&self, id: BookId, position: usize) -> Option<usize> {
        let slot = *self.slots.get(&id)?;
        self.sections
            .get(position)?
            .iter()
            .position(|&s| s == slot)
    }

    /// Iterates `(position, tag, books)` in section order.
    pub fn sections(&self) -> impl Iterator<Item = (usize, &Tag, Vec<&Book>)> + '_ {
        self.tags
            .iter()
            .enumerate()
            .map(move |(position, tag)| (position, tag, self.books_in(position)))
    }

    /// The book to show when nothing has been selected yet: the first
    /// favorite, otherwise the first book of the first tag section.
    ///
    /// `None` when both of those sections are empty.
    pub fn default_book(&self) -> Option<&Book> {
        if self.book_count(FAVORITES_SECTION) > 0 {
            self.book_at(0, FAVORITES_SECTION)
        } else {
            self.book_at(0, FAVORITES_SECTION + 1)
        }
    }

    // --- Books ---

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.slots.get(&id).map(|&slot| &self.books[slot])
    }

    /// Mutable access for flipping the favorite flag ahead of
    /// [`Catalog::toggle_favorite`].
    pub fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        let slot = *self.slots.get(&id)?;
        self.books.get_mut(slot)
    }

    /// Every book once, in input order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    // --- Mutation ---

    /// Brings the favorites section in line with the book's (already flipped)
    /// favorite flag.
    ///
    /// Favorited: the book is appended and the section re-sorted by title,
    /// ties broken by input order exactly as [`Catalog::build`] does.
    /// Unfavorited: the first entry that is this very book (by id) is removed.
    /// No other section is touched. Unknown ids are ignored.
    pub fn toggle_favorite(&mut self, id: BookId) {
        let Some(&slot) = self.slots.get(&id) else {
            return;
        };
        let books = &self.books;
        let favorites = &mut self.sections[FAVORITES_SECTION];

        if books[slot].is_favorite() {
            favorites.push(slot);
            favorites.sort_by(|&a, &b| by_title_then_slot(books, a, b));
            debug!(book = %books[slot], "added to favorites");
        } else if let Some(row) = favorites.iter().position(|&s| s == slot) {
            favorites.remove(row);
            debug!(book = %books[slot], "removed from favorites");
        }
    }

    /// Sets the flag and syncs the favorites section. Returns `false` when the
    /// book is unknown or already in the requested state.
    pub fn set_favorite(&mut self, id: BookId, is_favorite: bool) -> bool {
        match self.book_mut(id) {
            Some(book) if book.is_favorite() != is_favorite => {
                book.set_favorite(is_favorite);
            }
            _ => return false,
        }
        self.toggle_favorite(id);
        true
    }

    /// Points a book's cover or document at a new location (typically the
    /// local cached copy). Returns `false` for unknown ids.
    pub fn relocate_media(&mut self, id: BookId, kind: MediaKind, location: Url) -> bool {
        match self.book_mut(id) {
            Some(book) => {
                book.set_location(kind, location);
                true
            }
            None => false,
        }
    }

    // --- Serialization view ---

    /// One record per book, in input order. Rebuilding from these records
    /// gives back the same sections, same-titled books included, and books
    /// that belong to no section are kept.
    pub fn to_records(&self) -> Vec<BookRecord> {
        self.books.iter().map(BookRecord::from).collect()
    }
}

/// Section order: title, then input position.
fn by_title_then_slot(books: &[Book], a: usize, b: usize) -> Ordering {
    books[a].title().cmp(books[b].title()).then(a.cmp(&b))
}

/// Favorites followed by the distinct lower-cased tag names, sorted.
fn section_tags(books: &[Book]) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for book in books {
        for tag in book.tags() {
            if tag.shadows_favorites() {
                warn!(
                    book = %book.title(),
                    "tag '{}' looks like the favorites section but is kept as a separate section",
                    tag
                );
            }
            let name = tag.normalized();
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }
    names.sort();

    std::iter::once(Tag::favorites())
        .chain(names.into_iter().map(Tag::new))
        .collect()
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, tag, books) in self.sections() {
            writeln!(
                f,
                "{} - Section '{}' (contains {} books):",
                position,
                tag,
                books.len()
            )?;
            writeln!(f, "{}", "-".repeat(78))?;
            for book in books {
                writeln!(f, "   {}", book)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{book, book_by, favorite};

    fn titles(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.title().to_string()).collect()
    }

    fn algo_php_catalog() -> Catalog {
        Catalog::build(vec![
            book("Zeta", &["algo"]),
            book("Alpha", &["algo", "php"]),
        ])
    }

    #[test]
    fn builds_sections_favorites_first_then_tags() {
        let catalog = algo_php_catalog();

        assert_eq!(catalog.section_count(), 3);
        assert_eq!(catalog.tag_at(0), Some(&Tag::favorites()));
        assert_eq!(catalog.tag_at(1), Some(&Tag::new("algo")));
        assert_eq!(catalog.tag_at(2), Some(&Tag::new("php")));

        assert!(catalog.books_in(0).is_empty());
        assert_eq!(titles(&catalog.books_in(1)), vec!["Alpha", "Zeta"]);
        assert_eq!(titles(&catalog.books_in(2)), vec!["Alpha"]);
    }

    #[test]
    fn favoriting_adds_to_section_zero_only() {
        let mut catalog = algo_php_catalog();
        let alpha = catalog.book_at(0, 2).unwrap().id();

        catalog.book_mut(alpha).unwrap().set_favorite(true);
        catalog.toggle_favorite(alpha);

        assert_eq!(titles(&catalog.books_in(0)), vec!["Alpha"]);
        assert_eq!(titles(&catalog.books_in(1)), vec!["Alpha", "Zeta"]);
        assert_eq!(titles(&catalog.books_in(2)), vec!["Alpha"]);
    }

    #[test]
    fn default_book_without_favorites_is_first_of_section_one() {
        let catalog = algo_php_catalog();
        assert_eq!(catalog.default_book().map(Book::title), Some("Alpha"));
    }

    #[test]
    fn default_book_prefers_favorites() {
        let catalog = Catalog::build(vec![
            book("Alpha", &["algo"]),
            favorite("Omega", &["zzz"]),
        ]);
        assert_eq!(catalog.default_book().map(Book::title), Some("Omega"));
    }

    #[test]
    fn default_book_is_none_on_empty_catalog() {
        let catalog = Catalog::build(vec![]);
        assert_eq!(catalog.section_count(), 1);
        assert!(catalog.default_book().is_none());
    }

    #[test]
    fn default_book_is_none_when_no_tags_and_no_favorites() {
        let catalog = Catalog::build(vec![book("Loose", &[])]);
        assert!(catalog.default_book().is_none());
    }

    #[test]
    fn tags_are_case_folded_into_one_section() {
        let catalog = Catalog::build(vec![
            book("A", &["Python"]),
            book("B", &["python"]),
            book("C", &["PYTHON", "git"]),
        ]);

        assert_eq!(catalog.section_count(), 3);
        assert_eq!(catalog.tag_at(1).unwrap().name(), "git");
        assert_eq!(catalog.tag_at(2).unwrap().name(), "python");
        assert_eq!(catalog.book_count_for_tag(&Tag::new("Python")), 3);
    }

    #[test]
    fn same_titles_keep_input_order() {
        let first = book("Same", &["t"]);
        let second = book("Same", &["t"]);
        let (first_id, second_id) = (first.id(), second.id());
        let catalog = Catalog::build(vec![book("Zed", &["t"]), first, second]);

        let section = catalog.books_in(1);
        assert_eq!(section[0].id(), first_id);
        assert_eq!(section[1].id(), second_id);
        assert_eq!(section[2].title(), "Zed");
    }

    #[test]
    fn unfavoriting_removes_the_exact_book_not_a_namesake() {
        let first = favorite("Same", &["t"]);
        let second = favorite("Same", &["t"]);
        let (first_id, second_id) = (first.id(), second.id());
        let mut catalog = Catalog::build(vec![first, second]);

        assert!(catalog.set_favorite(second_id, false));

        let favorites = catalog.books_in(FAVORITES_SECTION);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id(), first_id);
    }

    #[test]
    fn toggle_add_then_remove_restores_favorites() {
        let mut catalog = Catalog::build(vec![
            favorite("B", &["x"]),
            favorite("D", &["x"]),
            book("C", &["x"]),
        ]);
        let before: Vec<BookId> = catalog.books_in(0).iter().map(|b| b.id()).collect();
        let c = catalog.book_for_tag(1, &Tag::new("x")).unwrap().id();

        catalog.set_favorite(c, true);
        assert_eq!(titles(&catalog.books_in(0)), vec!["B", "C", "D"]);
        catalog.set_favorite(c, false);

        let after: Vec<BookId> = catalog.books_in(0).iter().map(|b| b.id()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_without_flag_change_is_noop_for_removal() {
        let mut catalog = algo_php_catalog();
        let zeta = catalog.book_at(1, 1).unwrap().id();
        catalog.toggle_favorite(zeta);
        assert_eq!(catalog.book_count(0), 0);
    }

    #[test]
    fn set_favorite_reports_no_change() {
        let mut catalog = algo_php_catalog();
        let zeta = catalog.book_at(1, 1).unwrap().id();
        assert!(!catalog.set_favorite(zeta, false));
        assert!(catalog.set_favorite(zeta, true));
        assert!(!catalog.set_favorite(zeta, true));
        assert_eq!(catalog.book_count(0), 1);
    }

    #[test]
    fn lookups_are_total() {
        let catalog = algo_php_catalog();
        assert_eq!(catalog.tag_at(99), None);
        assert_eq!(catalog.book_count(99), 0);
        assert!(catalog.books_in(99).is_empty());
        assert!(catalog.book_at(0, 99).is_none());
        assert!(catalog.book_at(5, 1).is_none());
        assert!(catalog.book_at(0, 0).is_none());

        let missing = Tag::new("cobol");
        assert_eq!(catalog.section_of(&missing), None);
        assert_eq!(catalog.book_count_for_tag(&missing), 0);
        assert!(catalog.books_for_tag(&missing).is_empty());
        assert!(catalog.book_for_tag(0, &missing).is_none());
    }

    #[test]
    fn label_named_my_favorites_gets_its_own_section() {
        let catalog = Catalog::build(vec![book("A", &["My Favorites"]), book("B", &["algo"])]);

        assert_eq!(catalog.tag_at(0), Some(&Tag::favorites()));
        assert_eq!(catalog.book_count(0), 0);
        assert_eq!(catalog.section_count(), 3);
        assert_eq!(catalog.tag_at(2).unwrap().name(), "my favorites");
        assert_eq!(titles(&catalog.books_in(2)), vec!["A"]);
    }

    #[test]
    fn records_are_deduplicated() {
        let catalog = Catalog::build(vec![
            favorite("Multi", &["a", "b", "c"]),
            book("Single", &["a"]),
        ]);
        let records = catalog.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Multi");
        assert!(records[0].favorite);
    }

    #[test]
    fn records_include_books_outside_every_section() {
        let catalog = Catalog::build(vec![
            book("Loose", &[]),
            favorite("Tagged", &["a"]),
            book("Other", &["b"]),
        ]);
        let titles: Vec<_> = catalog.to_records().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Loose", "Tagged", "Other"]);
    }

    #[test]
    fn records_rebuild_same_titled_books_in_the_same_order() {
        let first = book_by("Same", "First", &["t"]);
        let second = book_by("Same", "Second", &["t"]).with_favorite(true);
        let catalog = Catalog::build(vec![first, second]);

        let rebuilt_books: Vec<Book> = catalog
            .to_records()
            .into_iter()
            .map(|r| Book::try_from(r).unwrap())
            .collect();
        let rebuilt = Catalog::build(rebuilt_books);

        let authors = |c: &Catalog| -> Vec<String> {
            c.books_in(1).iter().map(|b| b.authors_summary()).collect()
        };
        assert_eq!(authors(&rebuilt), vec!["First", "Second"]);
        assert_eq!(authors(&rebuilt), authors(&catalog));
    }

    #[test]
    fn favoriting_a_namesake_keeps_input_order() {
        let first = book("Same", &["t"]);
        let second = favorite("Same", &["t"]);
        let (first_id, second_id) = (first.id(), second.id());
        let mut catalog = Catalog::build(vec![first, second]);

        assert!(catalog.set_favorite(first_id, true));

        let favorites: Vec<BookId> = catalog.books_in(0).iter().map(|b| b.id()).collect();
        assert_eq!(favorites, vec![first_id, second_id]);

        let fresh = Catalog::build(catalog.books().cloned().collect());
        let fresh_favorites: Vec<BookId> = fresh.books_in(0).iter().map(|b| b.id()).collect();
        assert_eq!(favorites, fresh_favorites);
    }

    #[test]
    fn relocation_is_visible_from_every_section() {
        let mut catalog = Catalog::build(vec![book("A", &["x", "y"])]);
        let id = catalog.book_at(0, 1).unwrap().id();
        let local = Url::parse("file:///cache/Pdf/A.pdf").unwrap();

        assert!(catalog.relocate_media(id, MediaKind::Document, local.clone()));
        assert_eq!(catalog.book_at(0, 1).unwrap().document(), &local);
        assert_eq!(catalog.book_at(0, 2).unwrap().document(), &local);
    }

    #[test]
    fn row_of_finds_section_positions() {
        let catalog = algo_php_catalog();
        let zeta = catalog.book_at(1, 1).unwrap().id();
        assert_eq!(catalog.row_of(zeta, 1), Some(1));
        assert_eq!(catalog.row_of(zeta, 2), None);
    }

    #[test]
    fn debug_dump_lists_every_section() {
        let dump = algo_php_catalog().to_string();
        assert!(dump.contains("0 - Section 'My Favorites' (contains 0 books):"));
        assert!(dump.contains("1 - Section 'algo' (contains 2 books):"));
        assert!(dump.contains("'Alpha' by Jane Doe. (algo, php)"));
    }
}
