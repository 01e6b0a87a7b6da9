//! Durable persistence for [`UserState`].
//!
//! Every save is a full-document overwrite of pretty-printed JSON, so
//! concurrent writers race harmlessly (last response wins). Loads are
//! lenient: an absent or malformed document becomes the default state
//! rather than an error.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::ledger::UserState;

/// Load/save seam for user state, so tests can inject failing stores.
pub trait StateStore {
    fn load(&self) -> Result<UserState>;
    fn save(&self, state: &UserState) -> Result<()>;
}

/// The production store: one JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<UserState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no user state yet, using defaults");
            return Ok(UserState::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "user state is malformed, starting from defaults"
                );
                Ok(UserState::default())
            }
        }
    }

    fn save(&self, state: &UserState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(state).context("failed to serialize user state")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
