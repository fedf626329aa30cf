use crate::config::HackerBooksConfig;
use crate::events::LibraryEvent;
use crate::index::{DisplayBook, DisplaySection};
use crate::model::Book;
use std::path::PathBuf;

pub mod cache;
pub mod config;
pub mod dump;
pub mod favorite;
pub mod helpers;
pub mod init;
pub mod list;
pub mod load;
pub mod status;
pub mod view;

pub use status::LibraryStatus;

/// Where the library keeps its files (record list, config, caches).
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    pub data_dir: PathBuf,
}

impl LibraryPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_books: Vec<Book>,
    pub listed_sections: Vec<DisplaySection>,
    pub listed_books: Vec<DisplayBook>,
    pub config: Option<HackerBooksConfig>,
    pub status: Option<LibraryStatus>,
    pub dump: Option<String>,
    pub events: Vec<LibraryEvent>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_books(mut self, books: Vec<Book>) -> Self {
        self.affected_books = books;
        self
    }

    pub fn with_listed_sections(mut self, sections: Vec<DisplaySection>) -> Self {
        self.listed_sections = sections;
        self
    }

    pub fn with_listed_books(mut self, books: Vec<DisplayBook>) -> Self {
        self.listed_books = books;
        self
    }

    pub fn with_config(mut self, config: HackerBooksConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_status(mut self, status: LibraryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_dump(mut self, dump: String) -> Self {
        self.dump = Some(dump);
        self
    }

    /// True if any message was reported at warning level or above.
    pub fn has_problems(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}
