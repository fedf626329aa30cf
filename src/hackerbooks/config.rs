use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_REMOTE_URL: &str = "https://t.co/K9ziV0z3SJ";
const DEFAULT_IMAGES_DIR: &str = "Images";
const DEFAULT_PDF_DIR: &str = "Pdf";

/// Configuration for hackerbooks, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HackerBooksConfig {
    /// Where the book list is downloaded from
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Cache folder for cover images, relative to the data dir
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Cache folder for PDF documents, relative to the data dir
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_images_dir() -> String {
    DEFAULT_IMAGES_DIR.to_string()
}

fn default_pdf_dir() -> String {
    DEFAULT_PDF_DIR.to_string()
}

impl Default for HackerBooksConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            images_dir: default_images_dir(),
            pdf_dir: default_pdf_dir(),
        }
    }
}

pub const CONFIG_KEYS: &[&str] = &["remote-url", "images-dir", "pdf-dir"];

impl HackerBooksConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: HackerBooksConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "remote-url" => Some(self.remote_url.clone()),
            "images-dir" => Some(self.images_dir.clone()),
            "pdf-dir" => Some(self.pdf_dir.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "remote-url" => {
                url::Url::parse(value).map_err(|e| {
                    LibraryError::Api(format!("Invalid remote-url '{}': {}", value, e))
                })?;
                self.remote_url = value.to_string();
            }
            "images-dir" => self.images_dir = cache_dir_name(key, value)?,
            "pdf-dir" => self.pdf_dir = cache_dir_name(key, value)?,
            other => {
                return Err(LibraryError::Api(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }
}

fn cache_dir_name(key: &str, value: &str) -> Result<String> {
    if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(LibraryError::Api(format!(
            "{} must be a plain folder name, got '{}'",
            key, value
        )));
    }
    Ok(value.to_string())
}
