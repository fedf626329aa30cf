use crate::catalog::Catalog;
use crate::error::{LibraryError, Result};
use crate::index::{resolve_selector, BookSelector, DisplayBook, DisplayIndex};
use crate::model::BookId;
use crate::store::DataStore;

/// Resolves every selector. A selector that matches nothing is an error.
pub fn resolve_selectors(
    catalog: &Catalog,
    selectors: &[BookSelector],
) -> Result<Vec<(DisplayIndex, BookId)>> {
    let mut resolved = Vec::new();
    for selector in selectors {
        let matches = resolve_selector(catalog, selector);
        if matches.is_empty() {
            return Err(LibraryError::BookNotFound(selector.to_string()));
        }
        resolved.extend(matches);
    }
    Ok(resolved)
}

pub fn books_by_selectors(
    catalog: &Catalog,
    selectors: &[BookSelector],
) -> Result<Vec<DisplayBook>> {
    resolve_selectors(catalog, selectors)?
        .into_iter()
        .map(|(index, id)| {
            catalog
                .book(id)
                .map(|book| DisplayBook {
                    book: book.clone(),
                    index,
                })
                .ok_or_else(|| LibraryError::BookNotFound(index.to_string()))
        })
        .collect()
}

/// Writes the catalog's current state back to the store.
pub fn persist<S: DataStore>(catalog: &Catalog, store: &mut S) -> Result<()> {
    store.save_records(&catalog.to_records())
}
