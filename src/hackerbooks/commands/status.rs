use crate::catalog::{Catalog, FAVORITES_SECTION};
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::MediaKind;
use crate::store::{DataStore, DownloadMarker};
use std::path::PathBuf;

/// A summary of the library's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryStatus {
    pub books: usize,
    pub sections: usize,
    pub favorites: usize,
    pub local_covers: usize,
    pub local_documents: usize,
    pub downloaded: Option<DownloadMarker>,
    pub data_dir: Option<PathBuf>,
}

pub fn run<S: DataStore>(catalog: &Catalog, store: &S) -> Result<CmdResult> {
    let count_local = |kind| catalog.books().filter(|b| b.is_local(kind)).count();
    let status = LibraryStatus {
        books: catalog.len(),
        sections: catalog.section_count(),
        favorites: catalog.book_count(FAVORITES_SECTION),
        local_covers: count_local(MediaKind::Cover),
        local_documents: count_local(MediaKind::Document),
        downloaded: store.download_marker()?,
        data_dir: store.root().map(|p| p.to_path_buf()),
    };
    Ok(CmdResult::default().with_status(status))
}
