use crate::commands::{CmdMessage, CmdResult, LibraryPaths};
use crate::config::HackerBooksConfig;
use crate::error::Result;
use crate::store::DataStore;

/// Creates the data directory, its cache folders and a config file with the
/// defaults (an existing config is left alone).
pub fn run<S: DataStore>(paths: &LibraryPaths, store: &mut S) -> Result<CmdResult> {
    store.ensure_layout()?;
    let config_path = paths.data_dir.join("config.json");
    let mut result = CmdResult::default();
    if !config_path.exists() {
        HackerBooksConfig::load(&paths.data_dir)?.save(&paths.data_dir)?;
        result.add_message(CmdMessage::info(format!(
            "Wrote default configuration to {}",
            config_path.display()
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Initialized hackerbooks library at {}",
        paths.data_dir.display()
    )));
    Ok(result)
}
