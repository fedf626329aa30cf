use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LibraryError, Result};
use crate::index::{index_catalog, index_section};
use crate::tag::Tag;

/// Every section, favorites first. Empty sections are left out unless asked
/// for (only favorites can be empty).
pub fn run(catalog: &Catalog, include_empty: bool) -> CmdResult {
    let sections = index_catalog(catalog)
        .into_iter()
        .filter(|s| include_empty || !s.books.is_empty())
        .collect();
    CmdResult::default().with_listed_sections(sections)
}

/// One section, addressed by its position or by its tag name.
pub fn section(catalog: &Catalog, which: &str) -> Result<CmdResult> {
    let which = which.trim();
    let position = match which.parse::<usize>() {
        Ok(position) if position < catalog.section_count() => position,
        Ok(position) => {
            return Err(LibraryError::Api(format!(
                "Section {} does not exist (the library has {} sections)",
                position,
                catalog.section_count()
            )))
        }
        Err(_) => catalog
            .section_of(&Tag::new(which))
            .ok_or_else(|| LibraryError::Api(format!("No section for tag '{}'", which)))?,
    };

    let mut result = CmdResult::default();
    if let Some(tag) = catalog.tag_at(position) {
        let section = index_section(position, tag, &catalog.books_in(position));
        if section.books.is_empty() {
            result.add_message(CmdMessage::info(format!("'{}' is empty", tag)));
        }
        result.listed_sections.push(section);
    }
    Ok(result)
}
