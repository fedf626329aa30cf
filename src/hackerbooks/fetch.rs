//! Remote access: the book list and the media it points at.
//!
//! [`Fetcher`] is the seam between the commands and the network. Production
//! code uses [`HttpFetcher`] (blocking `ureq`); tests use
//! `fixtures::StubFetcher`. `file:` URLs are read straight from disk by
//! [`HttpFetcher`], which makes local catalogs and offline runs work the same
//! way as remote ones.

use std::fs;
use std::io::Read;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{LibraryError, Result};
use crate::record::parse_record_list;

const TIMEOUT: Duration = Duration::from_secs(30);

pub trait Fetcher {
    /// Download raw bytes.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Download a JSON array of (undecoded) book records.
    fn fetch_records(&self, url: &str) -> Result<Vec<Value>> {
        let bytes = self.fetch_bytes(url)?;
        let text = String::from_utf8(bytes).map_err(|e| LibraryError::Http {
            url: url.to_string(),
            message: format!("response is not UTF-8: {}", e),
        })?;
        parse_record_list(&text)
    }
}

pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Url::parse(url).map_err(|e| LibraryError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if parsed.scheme() == "file" {
            let path = parsed.to_file_path().map_err(|_| LibraryError::Http {
                url: url.to_string(),
                message: "not a valid local path".to_string(),
            })?;
            debug!(path = %path.display(), "reading local resource");
            return Ok(fs::read(path)?);
        }

        debug!(%url, "downloading");
        let response = self
            .agent
            .request_url("GET", &parsed)
            .call()
            .map_err(|e| LibraryError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let mut data = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut data)
            .map_err(|e| LibraryError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        debug!(%url, bytes = data.len(), "download finished");
        Ok(data)
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned responses and remembers what was asked for.
    #[derive(Default)]
    pub struct StubFetcher {
        responses: HashMap<String, Vec<u8>>,
        requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        pub fn with_records(self, url: &str, records: Vec<Value>) -> Self {
            self.with_response(url, Value::Array(records).to_string())
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| LibraryError::Http {
                    url: url.to_string(),
                    message: "404 Not Found".to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StubFetcher;
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_file_urls_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, r#"[{"title": "Local"}]"#).unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let records = HttpFetcher::new().fetch_records(url.as_str()).unwrap();
        assert_eq!(records, vec![json!({"title": "Local"})]);
    }

    #[test]
    fn missing_local_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("absent.json")).unwrap();
        assert!(HttpFetcher::new().fetch_bytes(url.as_str()).is_err());
    }

    #[test]
    fn invalid_url_is_an_http_error() {
        let err = HttpFetcher::new().fetch_bytes("::nope::").unwrap_err();
        assert!(matches!(err, LibraryError::Http { .. }));
    }

    #[test]
    fn record_fetch_requires_an_array() {
        let fetcher = StubFetcher::new().with_response("https://x/books.json", "{}");
        assert!(matches!(
            fetcher.fetch_records("https://x/books.json"),
            Err(LibraryError::Source(_))
        ));
    }

    #[test]
    fn stub_records_requests() {
        let fetcher = StubFetcher::new().with_response("https://x/a", "a");
        fetcher.fetch_bytes("https://x/a").unwrap();
        assert!(fetcher.fetch_bytes("https://x/b").is_err());
        assert_eq!(fetcher.requests(), vec!["https://x/a", "https://x/b"]);
    }
}
