//! Loading the library.
//!
//! The first run downloads the remote record list and keeps a local copy;
//! every later run starts from that copy, which also carries the user's
//! favorites and cached media locations. The download marker decides which
//! path is taken:
//!
//! 1. Marker present: read the local list. If it is missing or unreadable,
//!    fall back to the remote list.
//! 2. Marker absent (or a refresh was asked for): download, save, mark and
//!    create the cache folders. Failing to save only produces a warning; the
//!    catalog is still built from the downloaded records.
//! 3. No usable source at all: [`LibraryError::SourceUnavailable`].
//!
//! Records are decoded one by one; bad ones are skipped and reported.

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::HackerBooksConfig;
use crate::error::{LibraryError, Result};
use crate::fetch::Fetcher;
use crate::record::{decode_records, BookRecord};
use crate::store::{DataStore, DownloadMarker};
use serde_json::Value;
use tracing::{info, warn};

/// Loads the library, preferring the local copy once one exists.
pub fn run<S: DataStore, F: Fetcher>(
    store: &mut S,
    fetcher: &F,
    config: &HackerBooksConfig,
) -> Result<(Catalog, CmdResult)> {
    let mut result = CmdResult::default();

    let local = if store.download_marker()?.is_some() {
        match store.load_records() {
            Ok(Some(values)) => {
                result.add_message(CmdMessage::info(format!(
                    "Loaded {} records from the local library",
                    values.len()
                )));
                Some(values)
            }
            Ok(None) => {
                warn!("download marker present but no local record list");
                result.add_message(CmdMessage::warning(
                    "Local library is missing, downloading it again",
                ));
                None
            }
            Err(e) => {
                warn!(error = %e, "local record list is unreadable");
                result.add_message(CmdMessage::warning(format!(
                    "Local library is unreadable ({}), downloading it again",
                    e
                )));
                None
            }
        }
    } else {
        None
    };

    let values = match local {
        Some(values) => values,
        None => download(store, fetcher, config, &mut result)?,
    };

    Ok((build(values, &mut result), result))
}

/// Ignores the local copy and downloads the remote list again.
///
/// The local favorites and cached media are replaced by what the remote
/// serves.
pub fn refresh<S: DataStore, F: Fetcher>(
    store: &mut S,
    fetcher: &F,
    config: &HackerBooksConfig,
) -> Result<(Catalog, CmdResult)> {
    let mut result = CmdResult::default();
    let values = download(store, fetcher, config, &mut result)?;
    Ok((build(values, &mut result), result))
}

fn download<S: DataStore, F: Fetcher>(
    store: &mut S,
    fetcher: &F,
    config: &HackerBooksConfig,
    result: &mut CmdResult,
) -> Result<Vec<Value>> {
    let url = config.remote_url.as_str();
    let values = fetcher.fetch_records(url).map_err(|e| {
        warn!(%url, error = %e, "remote record list unavailable");
        LibraryError::SourceUnavailable
    })?;
    info!(%url, count = values.len(), "downloaded remote record list");
    result.add_message(CmdMessage::info(format!(
        "Downloaded {} records from {}",
        values.len(),
        url
    )));

    if let Err(e) = save_download(store, &values, url) {
        warn!(error = %e, "could not keep a local copy of the library");
        result.add_message(CmdMessage::warning(format!(
            "Could not save the library locally: {}",
            e
        )));
    }
    Ok(values)
}

/// Keeps the downloaded list as the local copy. Elements without the record
/// shape are dropped; records with unparsable locations are kept as they are.
fn save_download<S: DataStore>(store: &mut S, values: &[Value], url: &str) -> Result<()> {
    store.ensure_layout()?;
    let records: Vec<BookRecord> = values
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect();
    store.save_records(&records)?;
    store.mark_downloaded(&DownloadMarker::now(url))?;
    Ok(())
}

fn build(values: Vec<Value>, result: &mut CmdResult) -> Catalog {
    let decoded = decode_records(values);
    for skipped in &decoded.skipped {
        result.add_message(CmdMessage::warning(format!("Skipped {}", skipped)));
    }
    let catalog = Catalog::build(decoded.books);
    result.add_message(CmdMessage::success(format!(
        "Library ready: {} books in {} sections",
        catalog.len(),
        catalog.section_count()
    )));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::fetch::fixtures::StubFetcher;
    use crate::store::memory::fixtures::{remote_record, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use crate::tag::Tag;
    use serde_json::json;

    fn config() -> HackerBooksConfig {
        HackerBooksConfig {
            remote_url: "https://books.example.com/books.json".into(),
            ..HackerBooksConfig::default()
        }
    }

    fn remote() -> StubFetcher {
        StubFetcher::new().with_records(
            "https://books.example.com/books.json",
            vec![
                remote_record("Pro Git", "git, vcs"),
                remote_record("Learn You a Haskell", "haskell"),
            ],
        )
    }

    #[test]
    fn first_run_downloads_and_marks_the_store() {
        let mut store = InMemoryStore::new();
        let fetcher = remote();

        let (catalog, result) = run(&mut store, &fetcher, &config()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.section_count(), 4);
        assert_eq!(fetcher.requests(), vec!["https://books.example.com/books.json"]);
        let marker = store.download_marker().unwrap().unwrap();
        assert_eq!(marker.source, "https://books.example.com/books.json");
        assert!(store.layout_created());
        assert_eq!(store.load_records().unwrap().unwrap().len(), 2);
        assert!(!result.has_problems());
    }

    #[test]
    fn later_runs_use_the_local_copy() {
        let mut fixture =
            StoreFixture::new().with_local_records(vec![json!({
                "title": "Local Only",
                "authors": "A",
                "tags": "mine",
                "image_url": "https://x/c.jpg",
                "pdf_url": "https://x/d.pdf",
                "favorite": true
            })]);
        let fetcher = remote();

        let (catalog, _) = run(&mut fixture.store, &fetcher, &config()).unwrap();

        assert!(fetcher.requests().is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.book_count_for_tag(&Tag::favorites()), 1);
    }

    #[test]
    fn corrupt_local_copy_falls_back_to_remote() {
        let mut fixture = StoreFixture::new().with_corrupt_records();
        let fetcher = remote();

        let (catalog, result) = run(&mut fixture.store, &fetcher, &config()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(fetcher.requests().len(), 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("unreadable")));
        // The fresh download replaced the corrupt copy.
        assert!(fixture.store.load_records().is_ok());
    }

    #[test]
    fn no_source_at_all_is_fatal() {
        let mut fixture = StoreFixture::new().with_corrupt_records();
        let fetcher = StubFetcher::new();

        let err = run(&mut fixture.store, &fetcher, &config()).unwrap_err();
        assert!(matches!(err, LibraryError::SourceUnavailable));
    }

    #[test]
    fn remote_object_instead_of_array_is_unavailable() {
        let mut store = InMemoryStore::new();
        let fetcher =
            StubFetcher::new().with_response("https://books.example.com/books.json", "{}");
        assert!(matches!(
            run(&mut store, &fetcher, &config()),
            Err(LibraryError::SourceUnavailable)
        ));
    }

    #[test]
    fn save_failure_is_only_a_warning() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);

        let (catalog, result) = run(&mut store, &remote(), &config()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(result.has_problems());
        assert!(store.download_marker().unwrap().is_none());
    }

    #[test]
    fn bad_records_are_skipped_and_reported() {
        let mut store = InMemoryStore::new();
        let fetcher = StubFetcher::new().with_records(
            "https://books.example.com/books.json",
            vec![
                remote_record("Good", "ok"),
                json!({"title": "Broken", "authors": "A", "tags": "x",
                       "image_url": "not a url", "pdf_url": "https://x/d.pdf"}),
                json!(42),
            ],
        );

        let (catalog, result) = run(&mut store, &fetcher, &config()).unwrap();

        assert_eq!(catalog.len(), 1);
        let skipped = result
            .messages
            .iter()
            .filter(|m| m.content.starts_with("Skipped"))
            .count();
        assert_eq!(skipped, 2);
    }

    #[test]
    fn refresh_ignores_the_local_copy() {
        let mut fixture = StoreFixture::new().with_local_records(vec![remote_record("Old", "x")]);
        let fetcher = remote();

        let (catalog, _) = refresh(&mut fixture.store, &fetcher, &config()).unwrap();

        assert_eq!(fetcher.requests().len(), 1);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.books().all(|b| b.title() != "Old"));
    }
}
