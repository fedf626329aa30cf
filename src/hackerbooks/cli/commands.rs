//! # CLI Layer
//!
//! This module is **one possible UI client** for hackerbooks, not the
//! application itself. It is the only place that knows about the terminal:
//! argument parsing, colors, stdout/stderr and exit codes.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with the API over the data directory
//! - `handle_*()`: Per-command handlers that call the API and print the result
//!
//! Every command except `config` and `init` needs the library, so the
//! handlers load it first. Loading messages are only shown with `--verbose`
//! unless something went wrong.

use super::print::{
    print_config, print_full_books, print_messages, print_sections, print_status,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use hackerbooks::api::{CmdMessage, ConfigAction, HackerBooksApi, LibraryPaths, MessageLevel};
use hackerbooks::config::HackerBooksConfig;
use hackerbooks::error::{LibraryError, Result};
use hackerbooks::events::LibraryEvent;
use hackerbooks::fetch::HttpFetcher;
use hackerbooks::model::MediaKind;
use hackerbooks::store::fs::FileStore;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: HackerBooksApi<FileStore, HttpFetcher>,
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { all }) => handle_list(&mut ctx, all),
        Some(Commands::Section { which }) => handle_section(&mut ctx, which),
        Some(Commands::View { indexes }) => handle_view(&mut ctx, indexes),
        Some(Commands::Fav { indexes }) => handle_fav(&mut ctx, indexes, true),
        Some(Commands::Unfav { indexes }) => handle_fav(&mut ctx, indexes, false),
        Some(Commands::Cache { indexes, cover, pdf }) => {
            let kind = match (cover, pdf) {
                (true, _) => MediaKind::Cover,
                (false, _) => MediaKind::Document,
            };
            handle_cache(&mut ctx, indexes, kind)
        }
        Some(Commands::Status) => handle_status(&mut ctx),
        Some(Commands::Refresh) => handle_refresh(&mut ctx),
        Some(Commands::Dump) => handle_dump(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Init) => handle_init(&mut ctx),
        None => handle_list(&mut ctx, false),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hackerbooks=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    debug!(data_dir = %data_dir.display(), "using library directory");

    let config = HackerBooksConfig::load(&data_dir).unwrap_or_default();
    let store = FileStore::new(data_dir.clone()).with_config(&config);
    let mut api = HackerBooksApi::new(
        store,
        HttpFetcher::new(),
        LibraryPaths::new(data_dir),
        config,
    );
    api.subscribe(|event: &LibraryEvent| debug!(?event, "library changed"));

    Ok(AppContext {
        api,
        verbose: cli.verbose,
    })
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "hackerbooks", "hackerbooks")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LibraryError::Api("Could not determine the data directory".into()))
}

fn ensure_loaded(ctx: &mut AppContext) -> Result<()> {
    if ctx.api.catalog().is_some() {
        return Ok(());
    }
    let result = ctx.api.load()?;
    let shown: Vec<CmdMessage> = result
        .messages
        .into_iter()
        .filter(|m| ctx.verbose || matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
        .collect();
    print_messages(&shown);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, all: bool) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = ctx.api.sections(all)?;
    print_sections(&result.listed_sections);
    print_messages(&result.messages);
    Ok(())
}

fn handle_section(ctx: &mut AppContext, which: Vec<String>) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = ctx.api.section(&which.join(" "))?;
    print_sections(&result.listed_sections);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, indexes: Vec<String>) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = if indexes.is_empty() {
        ctx.api.default_book()?
    } else {
        ctx.api.view(&indexes)?
    };
    print_full_books(&result.listed_books);
    print_messages(&result.messages);
    Ok(())
}

fn handle_fav(ctx: &mut AppContext, indexes: Vec<String>, is_favorite: bool) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = if is_favorite {
        ctx.api.favorite(&indexes)?
    } else {
        ctx.api.unfavorite(&indexes)?
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_cache(ctx: &mut AppContext, indexes: Vec<String>, kind: MediaKind) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = ctx.api.cache_media(&indexes, kind)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &mut AppContext) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = ctx.api.status()?;
    if let Some(status) = &result.status {
        print_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_refresh(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.refresh()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_dump(ctx: &mut AppContext) -> Result<()> {
    ensure_loaded(ctx)?;
    let result = ctx.api.dump()?;
    if let Some(dump) = &result.dump {
        print!("{}", dump);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}
