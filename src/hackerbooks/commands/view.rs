use crate::catalog::{Catalog, FAVORITES_SECTION};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{BookSelector, DisplayBook, DisplayIndex};

use super::helpers::books_by_selectors;

pub fn run(catalog: &Catalog, selectors: &[BookSelector]) -> Result<CmdResult> {
    let books = books_by_selectors(catalog, selectors)?;
    Ok(CmdResult::default().with_listed_books(books))
}

/// The book shown when nothing was picked yet: the first favorite, otherwise
/// the first book of the first tag section.
pub fn default_book(catalog: &Catalog) -> CmdResult {
    let mut result = CmdResult::default();
    match catalog.default_book() {
        Some(book) => {
            let position = if catalog.book_count(FAVORITES_SECTION) > 0 {
                FAVORITES_SECTION
            } else {
                FAVORITES_SECTION + 1
            };
            result.listed_books.push(DisplayBook {
                book: book.clone(),
                index: DisplayIndex::at(position, 0),
            });
        }
        None => result.add_message(CmdMessage::info("The library is empty")),
    }
    result
}
