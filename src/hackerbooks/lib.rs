//! # HackerBooks Architecture
//!
//! HackerBooks is a **UI-agnostic reading-list library**: a catalog of
//! programming books grouped into one section per tag, with a "My Favorites"
//! section that the user curates. The `hb` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the loaded catalog, dispatches to commands          │
//! │  - Notifies observers of changes                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Load, list, view, favorite, cache, status, config...     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (catalog.rs, model.rs, tag.rs, record.rs)             │
//! │  Storage (store/) and remote access (fetch.rs)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Catalog
//!
//! [`catalog::Catalog`] is built once from the decoded books. Section 0 is
//! always favorites; the tag sections follow in alphabetical order. Every
//! section is sorted by title, and a book appears in the section of each of
//! its tags. Favoriting a book only ever touches section 0.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types
//! (`Result<CmdResult>`). It never prints and never exits. Diagnostics go
//! through `tracing`; what the user should read goes into `CmdResult`
//! messages.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Section index over the books
//! - [`model`]: `Book`, `BookId`, `MediaKind`
//! - [`tag`]: Section keys, including the favorites sentinel
//! - [`record`]: The JSON record format and partial decoding
//! - [`index`]: Display indexing (f1, 2.3 notation) and selectors
//! - [`store`]: Storage abstraction and implementations
//! - [`fetch`]: Downloading the book list and media
//! - [`events`]: Change notifications for observers
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod index;
pub mod model;
pub mod record;
pub mod store;
pub mod tag;
