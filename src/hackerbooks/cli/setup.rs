use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "hb", bin_name = "hb", version = get_version())]
#[command(about = "A reading list of programming books, sorted by tag", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Library directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "HB_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every section and its books
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Also show empty sections
        #[arg(long)]
        all: bool,
    },

    /// List one section, by position or tag name
    #[command(alias = "s", display_order = 2)]
    Section {
        /// Section position (0 is favorites) or tag name
        #[arg(required = true, num_args = 1..)]
        which: Vec<String>,
    },

    /// Show the details of one or more books
    #[command(alias = "v", display_order = 10)]
    View {
        /// Indexes of the books (e.g. f1 2.3) or a title search; empty for the default book
        #[arg(num_args = 0..)]
        indexes: Vec<String>,
    },

    /// Mark books as favorites
    #[command(display_order = 11)]
    Fav {
        /// Indexes of the books (e.g. 1.1 2.3) or a title search
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Remove books from the favorites
    #[command(display_order = 12)]
    Unfav {
        /// Indexes of the books (e.g. f1 f2) or a title search
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Download a book's cover or PDF into the local cache
    #[command(display_order = 13)]
    Cache {
        /// Indexes of the books or a title search
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        /// Cache the cover image
        #[arg(long, conflicts_with = "pdf")]
        cover: bool,

        /// Cache the PDF (the default)
        #[arg(long)]
        pdf: bool,
    },

    /// Summary of the library
    #[command(display_order = 20)]
    Status,

    /// Download the remote book list again, replacing the local one
    #[command(display_order = 21)]
    Refresh,

    /// Print the catalog's debug listing
    #[command(display_order = 22)]
    Dump,

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (remote-url, images-dir, pdf-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Create the library folders and a default configuration
    #[command(display_order = 31)]
    Init,
}
