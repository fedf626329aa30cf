//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every hackerbooks operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the session state**: the loaded [`Catalog`], the store, the
//!   fetcher and the configuration
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (display indexes and title searches to selectors)
//! - **Notifies observers** of the changes a command reports, after the
//!   command has persisted them
//!
//! It does no business logic and no presentation: commands decide, the UI
//! prints.
//!
//! ## Generic Over DataStore and Fetcher
//!
//! - Production: `HackerBooksApi<FileStore, HttpFetcher>`
//! - Testing: `HackerBooksApi<InMemoryStore, StubFetcher>`

use crate::catalog::Catalog;
use crate::commands;
use crate::config::HackerBooksConfig;
use crate::error::{LibraryError, Result};
use crate::events::{LibraryEvent, Observers};
use crate::fetch::Fetcher;
use crate::index::parse_selectors;
use crate::model::MediaKind;
use crate::store::DataStore;

pub struct HackerBooksApi<S: DataStore, F: Fetcher> {
    store: S,
    fetcher: F,
    paths: commands::LibraryPaths,
    config: HackerBooksConfig,
    catalog: Option<Catalog>,
    observers: Observers,
}

impl<S: DataStore, F: Fetcher> HackerBooksApi<S, F> {
    pub fn new(
        store: S,
        fetcher: F,
        paths: commands::LibraryPaths,
        config: HackerBooksConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            paths,
            config,
            catalog: None,
            observers: Observers::default(),
        }
    }

    /// Registers an observer for every later change.
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: FnMut(&LibraryEvent) + 'static,
    {
        self.observers.subscribe(Box::new(observer));
    }

    pub fn load(&mut self) -> Result<commands::CmdResult> {
        let (catalog, result) = commands::load::run(&mut self.store, &self.fetcher, &self.config)?;
        self.catalog = Some(catalog);
        Ok(result)
    }

    pub fn refresh(&mut self) -> Result<commands::CmdResult> {
        let (catalog, result) =
            commands::load::refresh(&mut self.store, &self.fetcher, &self.config)?;
        self.catalog = Some(catalog);
        Ok(result)
    }

    pub fn sections(&self, include_empty: bool) -> Result<commands::CmdResult> {
        Ok(commands::list::run(self.loaded()?, include_empty))
    }

    pub fn section(&self, which: &str) -> Result<commands::CmdResult> {
        commands::list::section(self.loaded()?, which)
    }

    pub fn view<I: AsRef<str>>(&self, indexes: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes);
        commands::view::run(self.loaded()?, &selectors)
    }

    pub fn default_book(&self) -> Result<commands::CmdResult> {
        Ok(commands::view::default_book(self.loaded()?))
    }

    pub fn favorite<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes);
        let catalog = self.catalog.as_mut().ok_or(LibraryError::NotLoaded)?;
        let result = commands::favorite::favorite(catalog, &mut self.store, &selectors)?;
        self.observers.notify(&result.events);
        Ok(result)
    }

    pub fn unfavorite<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes);
        let catalog = self.catalog.as_mut().ok_or(LibraryError::NotLoaded)?;
        let result = commands::favorite::unfavorite(catalog, &mut self.store, &selectors)?;
        self.observers.notify(&result.events);
        Ok(result)
    }

    pub fn cache_media<I: AsRef<str>>(
        &mut self,
        indexes: &[I],
        kind: MediaKind,
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes);
        let catalog = self.catalog.as_mut().ok_or(LibraryError::NotLoaded)?;
        let result =
            commands::cache::run(catalog, &mut self.store, &self.fetcher, &selectors, kind)?;
        self.observers.notify(&result.events);
        Ok(result)
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(self.loaded()?, &self.store)
    }

    pub fn dump(&self) -> Result<commands::CmdResult> {
        Ok(commands::dump::run(self.loaded()?))
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&mut self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths, &mut self.store)
    }

    /// The loaded catalog, if [`HackerBooksApi::load`] has run.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn paths(&self) -> &commands::LibraryPaths {
        &self.paths
    }

    pub fn settings(&self) -> &HackerBooksConfig {
        &self.config
    }

    fn loaded(&self) -> Result<&Catalog> {
        self.catalog.as_ref().ok_or(LibraryError::NotLoaded)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, LibraryPaths, LibraryStatus, MessageLevel};
