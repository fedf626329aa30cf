use chrono::{DateTime, Utc};
use colored::Colorize;
use hackerbooks::api::{CmdMessage, LibraryStatus, MessageLevel};
use hackerbooks::config::HackerBooksConfig;
use hackerbooks::index::{DisplayBook, DisplayIndex, DisplaySection};
use hackerbooks::model::MediaKind;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const INDEX_WIDTH: usize = 7;
const AUTHORS_WIDTH: usize = 30;
const FAVORITE_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_sections(sections: &[DisplaySection]) {
    if sections.iter().all(|s| s.books.is_empty()) {
        println!("No books found.");
        return;
    }

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let heading = format!("{} ({})", section.tag, section.books.len());
        if section.tag.is_favorites() {
            println!("{}", heading.yellow().bold());
        } else {
            println!("{}", heading.bold());
        }
        for db in &section.books {
            println!("{}", book_line(db));
        }
    }
}

fn book_line(db: &DisplayBook) -> String {
    let idx_str = format!("{}.", db.index);
    let idx_padded = format!("  {:<width$}", idx_str, width = INDEX_WIDTH);

    // Favorites are marked wherever else they show up.
    let in_favorites = matches!(db.index, DisplayIndex::Favorite(_));
    let marker = if db.book.is_favorite() && !in_favorites {
        format!(" {}", FAVORITE_MARKER)
    } else {
        "  ".to_string()
    };

    let authors = truncate_to_width(&db.book.authors_summary(), AUTHORS_WIDTH);
    let fixed_width = idx_padded.width() + marker.width() + AUTHORS_WIDTH + 1;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let title = truncate_to_width(db.book.title(), available);
    let padding = available.saturating_sub(title.width());

    let idx_colored = if in_favorites {
        idx_padded.yellow()
    } else {
        idx_padded.normal()
    };

    format!(
        "{}{}{}{} {}",
        idx_colored,
        title,
        " ".repeat(padding),
        marker.yellow(),
        authors.dimmed()
    )
}

pub(super) fn print_full_books(books: &[DisplayBook]) {
    for (i, db) in books.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let star = if db.book.is_favorite() {
            format!(" {}", FAVORITE_MARKER)
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            db.index.to_string().yellow(),
            db.book.title().bold(),
            star.yellow()
        );
        println!("--------------------------------");
        println!("{:<9}{}", "Authors:", db.book.authors_summary());
        println!("{:<9}{}", "Tags:", db.book.tags_summary());
        for kind in [MediaKind::Cover, MediaKind::Document] {
            let label = format!("{}:", kind);
            let location = db.book.location(kind).to_string();
            if db.book.is_local(kind) {
                println!("{:<9}{} {}", label, location, "(cached)".green());
            } else {
                println!("{:<9}{}", label, location);
            }
        }
    }
}

pub(super) fn print_status(status: &LibraryStatus) {
    println!("{:<16}{}", "Books:", status.books);
    println!("{:<16}{}", "Sections:", status.sections);
    println!("{:<16}{}", "Favorites:", status.favorites);
    println!(
        "{:<16}{} covers, {} PDFs",
        "Cached:", status.local_covers, status.local_documents
    );
    match &status.downloaded {
        Some(marker) => println!(
            "{:<16}{} from {}",
            "Downloaded:",
            format_time_ago(marker.downloaded_at).trim(),
            marker.source
        ),
        None => println!("{:<16}{}", "Downloaded:", "never".dimmed()),
    }
    if let Some(dir) = &status.data_dir {
        println!("{:<16}{}", "Library:", dir.display());
    }
}

pub(super) fn print_config(config: &HackerBooksConfig) {
    println!("remote-url = {}", config.remote_url);
    println!("images-dir = {}", config.images_dir);
    println!("pdf-dir = {}", config.pdf_dir);
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
