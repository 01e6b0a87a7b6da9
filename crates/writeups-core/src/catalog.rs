//! The on-disk catalog cache.
//!
//! The raw payload from the catalog source is cached verbatim so the tool
//! works offline; normalization happens on every load. A refresh replaces
//! the whole file, never patches it.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::model::Writeup;
use crate::normalize::parse_catalog;

/// Where the original deployment pulls its records from.
pub const DEFAULT_CATALOG_URL: &str = "https://pentester.land/writeups.json";

#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and normalize the cached catalog.
    ///
    /// A missing or unreadable cache yields an empty collection; parse
    /// problems inside the payload are already handled by the normalizer.
    #[must_use]
    pub fn load(&self) -> Vec<Writeup> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => parse_catalog(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no catalog cache yet");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "catalog cache unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replace the cache with a freshly fetched raw payload.
    pub fn replace(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
