//! Keeping a local copy of a book's cover or PDF.
//!
//! Once cached, the book's location is rewritten to the local `file:` URL and
//! the record list is saved, so the next run opens the local copy directly.

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LibraryError, Result};
use crate::events::LibraryEvent;
use crate::fetch::Fetcher;
use crate::index::BookSelector;
use crate::model::{BookId, MediaKind};
use crate::store::DataStore;
use tracing::info;

use super::helpers::{persist, resolve_selectors};

pub fn run<S: DataStore, F: Fetcher>(
    catalog: &mut Catalog,
    store: &mut S,
    fetcher: &F,
    selectors: &[BookSelector],
    kind: MediaKind,
) -> Result<CmdResult> {
    let resolved = resolve_selectors(catalog, selectors)?;
    let mut result = CmdResult::default();
    let mut seen: Vec<BookId> = Vec::new();

    for (display_index, id) in resolved {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        cache_one(catalog, store, fetcher, id, kind, &mut result).map_err(|e| match e {
            LibraryError::BookNotFound(_) => LibraryError::BookNotFound(display_index.to_string()),
            other => other,
        })?;
    }

    if !result.events.is_empty() {
        persist(catalog, store)?;
    }
    Ok(result)
}

fn cache_one<S: DataStore, F: Fetcher>(
    catalog: &mut Catalog,
    store: &mut S,
    fetcher: &F,
    id: BookId,
    kind: MediaKind,
    result: &mut CmdResult,
) -> Result<()> {
    let book = catalog
        .book(id)
        .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;
    let title = book.title().to_string();

    if book.is_local(kind) {
        result.add_message(CmdMessage::info(format!(
            "The {} of {} is already local: {}",
            kind,
            title,
            book.location(kind)
        )));
        result.affected_books.push(book.clone());
        return Ok(());
    }

    let remote = book.location(kind).clone();
    let file_name = book.file_name(kind).ok_or_else(|| {
        LibraryError::Api(format!("Cannot name a local copy of {}", remote))
    })?;

    let location = match store.cached_media(kind, &file_name)? {
        Some(location) => location,
        None => {
            let bytes = fetcher.fetch_bytes(remote.as_str())?;
            let location = store.write_media(kind, &file_name, &bytes)?;
            info!(book = %title, %kind, %location, bytes = bytes.len(), "media cached");
            location
        }
    };

    catalog.relocate_media(id, kind, location.clone());
    result.add_message(CmdMessage::success(format!(
        "Cached the {} of {} at {}",
        kind, title, location
    )));
    result.events.push(LibraryEvent::MediaRelocated {
        id,
        kind,
        location,
    });
    if let Some(book) = catalog.book(id) {
        result.affected_books.push(book.clone());
    }
    Ok(())
}
