//! # Storage Layer
//!
//! This module defines the storage abstraction for hackerbooks. The
//! [`DataStore`] trait lets the commands persist the library without knowing
//! where it ends up.
//!
//! ## What Gets Stored
//!
//! - The **record list**: the last known state of every book, favorites
//!   included, as a JSON array of [`BookRecord`]s.
//! - The **download marker**: whether (and when) the remote catalog was
//!   fetched. Its presence switches later runs to the local record list.
//! - **Media blobs**: cached cover images and PDF documents.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── books.json      # Persisted record list (JSON array)
//! ├── state.json      # Download marker
//! ├── config.json     # Configuration
//! ├── Images/         # Cached covers
//! └── Pdf/            # Cached documents
//! ```

use crate::error::Result;
use crate::model::MediaKind;
use crate::record::BookRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use url::Url;

pub mod fs;
pub mod memory;

/// Records that the remote catalog has been downloaded at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadMarker {
    pub downloaded_at: DateTime<Utc>,
    pub source: String,
}

impl DownloadMarker {
    pub fn now(source: impl Into<String>) -> Self {
        Self {
            downloaded_at: Utc::now(),
            source: source.into(),
        }
    }
}

/// Abstract interface for library storage.
pub trait DataStore {
    /// Load the persisted record list. `Ok(None)` when nothing was ever saved;
    /// `Err` when something was saved but cannot be read back.
    fn load_records(&self) -> Result<Option<Vec<Value>>>;

    /// Replace the persisted record list.
    fn save_records(&mut self, records: &[BookRecord]) -> Result<()>;

    fn download_marker(&self) -> Result<Option<DownloadMarker>>;

    fn mark_downloaded(&mut self, marker: &DownloadMarker) -> Result<()>;

    /// Create whatever folders the store needs (data dir, media caches).
    fn ensure_layout(&mut self) -> Result<()>;

    /// Store a media blob and return its local `file:` location.
    fn write_media(&mut self, kind: MediaKind, file_name: &str, bytes: &[u8]) -> Result<Url>;

    /// Location of an already cached blob, if there is one.
    fn cached_media(&self, kind: MediaKind, file_name: &str) -> Result<Option<Url>>;

    /// Data directory, for stores that have one.
    fn root(&self) -> Option<&Path>;
}
