use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::events::LibraryEvent;
use crate::index::BookSelector;
use crate::store::DataStore;

use super::helpers::{persist, resolve_selectors};

pub fn favorite<S: DataStore>(
    catalog: &mut Catalog,
    store: &mut S,
    selectors: &[BookSelector],
) -> Result<CmdResult> {
    favorite_state(catalog, store, selectors, true)
}

pub fn unfavorite<S: DataStore>(
    catalog: &mut Catalog,
    store: &mut S,
    selectors: &[BookSelector],
) -> Result<CmdResult> {
    favorite_state(catalog, store, selectors, false)
}

fn favorite_state<S: DataStore>(
    catalog: &mut Catalog,
    store: &mut S,
    selectors: &[BookSelector],
    is_favorite: bool,
) -> Result<CmdResult> {
    let resolved = resolve_selectors(catalog, selectors)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let changed = catalog.set_favorite(id, is_favorite);
        let Some(book) = catalog.book(id) else {
            continue;
        };

        if !changed {
            let state = if is_favorite {
                "already a favorite"
            } else {
                "not a favorite"
            };
            result.add_message(CmdMessage::info(format!(
                "{} ({}) is {}",
                book.title(),
                display_index,
                state
            )));
            continue;
        }

        let verb = if is_favorite {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        result.add_message(CmdMessage::success(format!(
            "{} ({}): {}",
            verb,
            display_index,
            book.title()
        )));
        result.events.push(LibraryEvent::FavoriteChanged {
            id,
            title: book.title().to_string(),
            is_favorite,
        });
        result.affected_books.push(book.clone());
    }

    if !result.events.is_empty() {
        persist(catalog, store)?;
    }
    Ok(result)
}
