//! Command handlers, one module per subcommand.

pub mod config;
pub mod day;
pub mod export;
pub mod facets;
pub mod heatmap;
pub mod import;
pub mod list;
pub mod note;
pub mod progress;
pub mod read;
pub mod refresh;

use anyhow::Result;
use std::path::Path;

use writeups_core::catalog::CatalogCache;
use writeups_core::session::Session;
use writeups_core::store::JsonFileStore;

/// Raw catalog payload cache inside the data directory.
pub fn catalog_cache(data_dir: &Path) -> CatalogCache {
    CatalogCache::new(data_dir.join("writeups.json"))
}

/// User state store inside the data directory.
pub fn state_store(data_dir: &Path) -> JsonFileStore {
    JsonFileStore::new(data_dir.join("userdata.json"))
}

/// Open a session over the local cache and state files.
pub fn open_session(data_dir: &Path) -> Result<Session<JsonFileStore>> {
    Session::open(state_store(data_dir), &catalog_cache(data_dir))
}
