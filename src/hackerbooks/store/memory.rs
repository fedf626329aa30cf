use super::{DataStore, DownloadMarker};
use crate::error::{LibraryError, Result};
use crate::model::MediaKind;
use crate::record::{encode_records, parse_record_list, BookRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// In-memory storage for testing.
///
/// The record list is kept as JSON text so that loading goes through the same
/// parsing path as the file store.
#[derive(Default)]
pub struct InMemoryStore {
    records: Option<String>,
    marker: Option<DownloadMarker>,
    media: HashMap<(MediaKind, String), Vec<u8>>,
    layout_created: bool,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail, for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Replace the stored record list with arbitrary text.
    pub fn set_raw_records(&mut self, text: impl Into<String>) {
        self.records = Some(text.into());
    }

    pub fn raw_records(&self) -> Option<&str> {
        self.records.as_deref()
    }

    pub fn media(&self, kind: MediaKind, file_name: &str) -> Option<&[u8]> {
        self.media
            .get(&(kind, file_name.to_string()))
            .map(Vec::as_slice)
    }

    pub fn layout_created(&self) -> bool {
        self.layout_created
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(LibraryError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn media_url(kind: MediaKind, file_name: &str) -> Result<Url> {
        let folder = match kind {
            MediaKind::Cover => "Images",
            MediaKind::Document => "Pdf",
        };
        Url::parse(&format!("file:///memory/{}/{}", folder, file_name))
            .map_err(|e| LibraryError::Store(e.to_string()))
    }
}

impl DataStore for InMemoryStore {
    fn load_records(&self) -> Result<Option<Vec<Value>>> {
        match &self.records {
            Some(text) => parse_record_list(text).map(Some),
            None => Ok(None),
        }
    }

    fn save_records(&mut self, records: &[BookRecord]) -> Result<()> {
        self.check_writable()?;
        self.records = Some(encode_records(records)?);
        Ok(())
    }

    fn download_marker(&self) -> Result<Option<DownloadMarker>> {
        Ok(self.marker.clone())
    }

    fn mark_downloaded(&mut self, marker: &DownloadMarker) -> Result<()> {
        self.check_writable()?;
        self.marker = Some(marker.clone());
        Ok(())
    }

    fn ensure_layout(&mut self) -> Result<()> {
        self.check_writable()?;
        self.layout_created = true;
        Ok(())
    }

    fn write_media(&mut self, kind: MediaKind, file_name: &str, bytes: &[u8]) -> Result<Url> {
        self.check_writable()?;
        self.media
            .insert((kind, file_name.to_string()), bytes.to_vec());
        Self::media_url(kind, file_name)
    }

    fn cached_media(&self, kind: MediaKind, file_name: &str) -> Result<Option<Url>> {
        if self.media.contains_key(&(kind, file_name.to_string())) {
            Self::media_url(kind, file_name).map(Some)
        } else {
            Ok(None)
        }
    }

    fn root(&self) -> Option<&Path> {
        None
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::json;

    /// A raw record as the remote catalog would serve it (no `favorite`).
    pub fn remote_record(title: &str, tags: &str) -> Value {
        json!({
            "title": title,
            "authors": "Jane Doe",
            "tags": tags,
            "image_url": format!("https://books.example.com/covers/{}.jpg", title),
            "pdf_url": format!("https://books.example.com/pdf/{}.pdf", title),
        })
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// A store that already holds a local record list and the download marker.
        pub fn with_local_records(mut self, records: Vec<Value>) -> Self {
            self.store
                .set_raw_records(Value::Array(records).to_string());
            self.store
                .mark_downloaded(&DownloadMarker::now("https://books.example.com/books.json"))
                .unwrap();
            self
        }

        pub fn with_corrupt_records(mut self) -> Self {
            self.store.set_raw_records("[{ broken");
            self.store
                .mark_downloaded(&DownloadMarker::now("https://books.example.com/books.json"))
                .unwrap();
            self
        }
    }
}
