//! The owned session state.
//!
//! One value holds the normalized catalog and the user state, replacing the
//! ambient globals of a browser frontend. Mutations are write-through: the
//! in-memory update happens first, then the store persists the full
//! document. A failed persist keeps the in-memory state (no rollback, no
//! retry) and surfaces the error to the caller as a notice.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::CatalogCache;
use crate::filter::{self, FilterState};
use crate::heatmap::{self, DayRead, Heatmap, same_iso_week};
use crate::ledger::{SettingsPatch, UserImport, UserState};
use crate::model::{Writeup, parse_when};
use crate::store::StateStore;

/// Why a key lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyLookupError {
    #[error("no write-up matches '{0}'")]
    NotFound(String),
    #[error("'{query}' matches {} write-ups", .matches.len())]
    Ambiguous { query: String, matches: Vec<String> },
}

/// Overall and weekly read progress against the current catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub read: usize,
    pub total: usize,
    pub percent: u32,
    pub week_read: usize,
    pub weekly_goal: u32,
    pub week_percent: u32,
}

pub struct Session<S: StateStore> {
    writeups: Vec<Writeup>,
    state: UserState,
    store: S,
}

impl<S: StateStore> Session<S> {
    /// Load user state from the store and the catalog from its cache.
    pub fn open(store: S, catalog: &CatalogCache) -> Result<Self> {
        let state = store.load().context("failed to load user state")?;
        let writeups = catalog.load();
        info!(writeups = writeups.len(), reads = state.read.len(), "session opened");
        Ok(Self {
            writeups,
            state,
            store,
        })
    }

    #[must_use]
    pub fn writeups(&self) -> &[Writeup] {
        &self.writeups
    }

    #[must_use]
    pub fn state(&self) -> &UserState {
        &self.state
    }

    /// Swap in a rebuilt catalog after a refresh. Identity keys are
    /// recomputed from scratch; ledger entries are untouched.
    pub fn replace_catalog(&mut self, writeups: Vec<Writeup>) {
        self.writeups = writeups;
    }

    /// Run the filter/sort pipeline over the current catalog.
    #[must_use]
    pub fn query(&self, filter: &FilterState) -> Vec<&Writeup> {
        filter::apply(&self.writeups, filter, &self.state.read)
    }

    /// Resolve a user-supplied key: exact identity key first, then a
    /// case-insensitive title substring (must be unique).
    pub fn resolve_key(&self, query: &str) -> Result<String, KeyLookupError> {
        if self.writeups.iter().any(|w| w.identity_key() == query) {
            return Ok(query.to_string());
        }

        let needle = query.to_lowercase();
        let matches: Vec<String> = self
            .writeups
            .iter()
            .filter(|w| w.title.to_lowercase().contains(&needle))
            .map(Writeup::identity_key)
            .collect();

        match matches.as_slice() {
            [] => Err(KeyLookupError::NotFound(query.to_string())),
            [one] => Ok(one.clone()),
            _ => Err(KeyLookupError::Ambiguous {
                query: query.to_string(),
                matches,
            }),
        }
    }

    /// Flip read state; returns the new state after persisting.
    pub fn toggle_read(&mut self, key: &str) -> Result<bool> {
        let now_read = self.state.toggle_read(key, Utc::now());
        self.persist()?;
        Ok(now_read)
    }

    /// Set or clear a note, then persist.
    pub fn set_note(&mut self, key: &str, text: &str) -> Result<()> {
        self.state.set_note(key, text);
        self.persist()
    }

    /// Apply a settings patch, then persist.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<()> {
        patch.apply(&mut self.state.settings);
        self.persist()
    }

    /// Parse and merge an exported document. Invalid JSON aborts before
    /// any mutation; a valid merge persists the combined state.
    pub fn import_merge(&mut self, text: &str) -> Result<()> {
        let imported: UserImport =
            serde_json::from_str(text).context("import is not valid user state JSON")?;
        self.state.merge_imported(&imported);
        self.persist()
    }

    /// The full user state as pretty-printed JSON for download.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.state).context("failed to serialize user state")
    }

    #[must_use]
    pub fn heatmap(&self, today: NaiveDate) -> Heatmap {
        heatmap::build(&self.state.read, today)
    }

    #[must_use]
    pub fn reads_on(&self, day: NaiveDate) -> Vec<DayRead<'_>> {
        heatmap::reads_on(&self.writeups, &self.state, day)
    }

    /// Progress against the current catalog; ledger entries for items no
    /// longer in the catalog do not count.
    #[must_use]
    pub fn progress(&self, now: chrono::DateTime<Utc>) -> ProgressReport {
        let keys: std::collections::HashSet<String> =
            self.writeups.iter().map(Writeup::identity_key).collect();

        let read = self
            .state
            .read
            .keys()
            .filter(|k| keys.contains(k.as_str()))
            .count();
        let week_read = self
            .state
            .read
            .iter()
            .filter(|(k, ts)| {
                keys.contains(k.as_str())
                    && parse_when(ts).is_some_and(|t| same_iso_week(t, now))
            })
            .count();

        let total = self.writeups.len();
        let weekly_goal = self.state.settings.weekly_goal;
        ProgressReport {
            read,
            total,
            percent: percent_of(read, total),
            week_read,
            weekly_goal,
            week_percent: percent_of(week_read, weekly_goal as usize).min(100),
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.state).context("failed to persist user state")
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percent_of(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyLookupError, Session};
    use crate::catalog::CatalogCache;
    use crate::ledger::{SettingsPatch, UserState};
    use crate::model::Writeup;
    use crate::store::{JsonFileStore, StateStore};
    use anyhow::Result;

    /// A store whose saves always fail, for write-through semantics tests.
    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn load(&self) -> Result<UserState> {
            Ok(UserState::default())
        }

        fn save(&self, _state: &UserState) -> Result<()> {
            anyhow::bail!("disk on fire")
        }
    }

    fn catalog_of(titles: &[(&str, &str)]) -> Vec<Writeup> {
        titles
            .iter()
            .map(|(title, url)| Writeup {
                title: (*title).to_string(),
                url: (*url).to_string(),
                ..Writeup::default()
            })
            .collect()
    }

    fn session_in(dir: &std::path::Path) -> Session<JsonFileStore> {
        let store = JsonFileStore::new(dir.join("userdata.json"));
        let cache = CatalogCache::new(dir.join("writeups.json"));
        let mut session = Session::open(store, &cache).expect("open");
        session.replace_catalog(catalog_of(&[
            ("SSRF in media proxy", "https://a.example/ssrf"),
            ("Stored XSS via SVG", "https://b.example/xss"),
        ]));
        session
    }

    #[test]
    fn toggle_read_persists_through_the_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());

        assert!(session.toggle_read("https://a.example/ssrf").expect("toggle"));

        // A second session sees the persisted read mark.
        let reopened = session_in(dir.path());
        assert!(reopened.state().is_read("https://a.example/ssrf"));
    }

    #[test]
    fn failed_persist_keeps_in_memory_state() {
        let cache = CatalogCache::new(std::path::PathBuf::from("/nonexistent/writeups.json"));
        let mut session = Session::open(BrokenStore, &cache).expect("open");

        let err = session.toggle_read("https://a.example/ssrf");
        assert!(err.is_err());
        // No rollback: the mutation stays visible.
        assert!(session.state().is_read("https://a.example/ssrf"));
    }

    #[test]
    fn resolve_key_exact_then_title_substring() {
        let dir = tempfile::tempdir().expect("temp dir");
        let session = session_in(dir.path());

        assert_eq!(
            session.resolve_key("https://a.example/ssrf").expect("exact"),
            "https://a.example/ssrf"
        );
        assert_eq!(
            session.resolve_key("svg").expect("unique fragment"),
            "https://b.example/xss"
        );
        assert!(matches!(
            session.resolve_key("zzz"),
            Err(KeyLookupError::NotFound(_))
        ));
        assert!(matches!(
            session.resolve_key("s"),
            Err(KeyLookupError::Ambiguous { .. })
        ));
    }

    #[test]
    fn import_invalid_json_mutates_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());
        session.toggle_read("https://a.example/ssrf").expect("toggle");

        let before = session.state().clone();
        assert!(session.import_merge("{ not json").is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn export_then_import_reproduces_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());
        session.toggle_read("https://a.example/ssrf").expect("toggle");
        session
            .set_note("https://a.example/ssrf", "great chain")
            .expect("note");
        session
            .update_settings(&SettingsPatch {
                weekly_goal: Some(4),
                ..SettingsPatch::default()
            })
            .expect("settings");

        let exported = session.export_json().expect("export");

        let fresh_dir = tempfile::tempdir().expect("temp dir");
        let mut fresh = session_in(fresh_dir.path());
        fresh.import_merge(&exported).expect("import");

        assert_eq!(fresh.state(), session.state());
    }

    #[test]
    fn progress_counts_only_cataloged_reads() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session_in(dir.path());
        session.toggle_read("https://a.example/ssrf").expect("toggle");
        // A stale ledger key from an item no longer in the catalog.
        session.toggle_read("https://gone.example/old").expect("toggle");

        let report = session.progress(chrono::Utc::now());
        assert_eq!(report.read, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.percent, 50);
        assert_eq!(report.week_read, 1);
        assert_eq!(report.weekly_goal, 10);
        assert_eq!(report.week_percent, 10);
    }
}
