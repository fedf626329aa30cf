use thiserror::Error;

/// Why a single book record could not be turned into a [`crate::model::Book`].
///
/// These never abort a whole decode: the offending record is skipped and
/// reported, and its siblings are still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Wrong record format: {0}")]
    Format(String),

    #[error("Invalid URL in field '{field}': {value}")]
    InvalidUri { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Download failed for {url}: {message}")]
    Http { url: String, message: String },

    #[error("Source error: {0}")]
    Source(String),

    #[error("Unable to get book data from the local store nor the remote catalog")]
    SourceUnavailable,

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("The library has not been loaded yet")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, LibraryError>;
