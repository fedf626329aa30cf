use super::{DataStore, DownloadMarker};
use crate::config::HackerBooksConfig;
use crate::error::{LibraryError, Result};
use crate::model::MediaKind;
use crate::record::{encode_records, parse_record_list, BookRecord};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const RECORDS_FILENAME: &str = "books.json";
const STATE_FILENAME: &str = "state.json";

pub struct FileStore {
    root: PathBuf,
    images_dir: String,
    pdf_dir: String,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        let defaults = HackerBooksConfig::default();
        Self {
            root,
            images_dir: defaults.images_dir,
            pdf_dir: defaults.pdf_dir,
        }
    }

    pub fn with_config(mut self, config: &HackerBooksConfig) -> Self {
        self.images_dir = config.images_dir.clone();
        self.pdf_dir = config.pdf_dir.clone();
        self
    }

    pub fn records_path(&self) -> PathBuf {
        self.root.join(RECORDS_FILENAME)
    }

    fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILENAME)
    }

    pub fn media_dir(&self, kind: MediaKind) -> PathBuf {
        match kind {
            MediaKind::Cover => self.root.join(&self.images_dir),
            MediaKind::Document => self.root.join(&self.pdf_dir),
        }
    }

    fn media_path(&self, kind: MediaKind, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name);
        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(LibraryError::Store(format!(
                "Refusing to cache media under unsafe name '{}'",
                file_name
            )));
        }
        Ok(self.media_dir(kind).join(name))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Writes to a temporary sibling first so a crash never leaves a
    /// half-written file behind.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn file_url(path: &Path) -> Result<Url> {
    let absolute = fs::canonicalize(path)?;
    Url::from_file_path(&absolute).map_err(|_| {
        LibraryError::Store(format!("Cannot express {} as a URL", absolute.display()))
    })
}

impl DataStore for FileStore {
    fn load_records(&self) -> Result<Option<Vec<Value>>> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "loading local record list");
        let content = fs::read_to_string(&path)?;
        parse_record_list(&content).map(Some)
    }

    fn save_records(&mut self, records: &[BookRecord]) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = encode_records(records)?;
        self.write_atomic(&self.records_path(), content.as_bytes())?;
        debug!(count = records.len(), "saved record list");
        Ok(())
    }

    fn download_marker(&self) -> Result<Option<DownloadMarker>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn mark_downloaded(&mut self, marker: &DownloadMarker) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(marker)?;
        self.write_atomic(&self.state_path(), content.as_bytes())
    }

    fn ensure_layout(&mut self) -> Result<()> {
        self.ensure_dir(&self.root)?;
        self.ensure_dir(&self.media_dir(MediaKind::Cover))?;
        self.ensure_dir(&self.media_dir(MediaKind::Document))?;
        Ok(())
    }

    fn write_media(&mut self, kind: MediaKind, file_name: &str, bytes: &[u8]) -> Result<Url> {
        let path = self.media_path(kind, file_name)?;
        self.ensure_dir(&self.media_dir(kind))?;
        self.write_atomic(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "cached {}", kind);
        file_url(&path)
    }

    fn cached_media(&self, kind: MediaKind, file_name: &str) -> Result<Option<Url>> {
        let path = self.media_path(kind, file_name)?;
        if path.exists() {
            file_url(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
