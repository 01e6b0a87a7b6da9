//! Per-user state: read timestamps, notes, and settings.
//!
//! Keys are write-up identity keys; values persist until toggled off or
//! overwritten by an import-merge. This module is purely in-memory; the
//! persist-after-mutation cycle lives in [`crate::session`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{SortMode, parse_when};

/// identity key -> ISO timestamp of the read event.
pub type ReadMap = BTreeMap<String, String>;
/// identity key -> note text. Absent key = no note; empty text is never stored.
pub type NoteMap = BTreeMap<String, String>;

/// User-tunable settings, persisted inside [`UserState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark: bool,
    pub sort: SortMode,
    #[serde(alias = "weeklyGoal")]
    pub weekly_goal: u32,
    /// Whether the presentation layer offers an "open in browser" action.
    #[serde(alias = "showOpen")]
    pub show_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark: false,
            sort: SortMode::DateDesc,
            weekly_goal: 10,
            show_open: true,
        }
    }
}

/// A partial settings update; only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub dark: Option<bool>,
    pub sort: Option<SortMode>,
    #[serde(alias = "weeklyGoal")]
    pub weekly_goal: Option<u32>,
    #[serde(alias = "showOpen")]
    pub show_open: Option<bool>,
}

impl SettingsPatch {
    /// Apply present fields over `settings`, incoming keys winning.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(dark) = self.dark {
            settings.dark = dark;
        }
        if let Some(sort) = self.sort {
            settings.sort = sort;
        }
        if let Some(goal) = self.weekly_goal {
            settings.weekly_goal = goal;
        }
        if let Some(show_open) = self.show_open {
            settings.show_open = show_open;
        }
    }

    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dark.is_none()
            && self.sort.is_none()
            && self.weekly_goal.is_none()
            && self.show_open.is_none()
    }
}

/// The full persisted per-user document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserState {
    pub read: ReadMap,
    pub comments: NoteMap,
    pub settings: Settings,
}

/// An imported document, parsed leniently; settings arrive as a patch so
/// absent incoming keys never clobber local values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserImport {
    pub read: ReadMap,
    pub comments: NoteMap,
    pub settings: Option<SettingsPatch>,
}

impl UserState {
    #[must_use]
    pub fn is_read(&self, key: &str) -> bool {
        self.read.contains_key(key)
    }

    /// Flip read state for `key`.
    ///
    /// Records `now` as an ISO timestamp when transitioning to read, removes
    /// the entry when transitioning to unread. Returns the new read state.
    pub fn toggle_read(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        if self.read.remove(key).is_some() {
            false
        } else {
            self.read.insert(
                key.to_string(),
                now.to_rfc3339_opts(SecondsFormat::Millis, true),
            );
            true
        }
    }

    /// Store trimmed note text under `key`; empty text deletes the note.
    pub fn set_note(&mut self, key: &str, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.comments.remove(key);
        } else {
            self.comments.insert(key.to_string(), trimmed.to_string());
        }
    }

    #[must_use]
    pub fn note(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    /// Merge an imported document into this state.
    ///
    /// Read timestamps: last-write-wins by recency, an incoming entry only
    /// replaces an existing one when its timestamp is strictly later (and
    /// both parse). Notes: incoming values only fill keys absent locally.
    /// Settings: shallow patch, incoming keys winning.
    pub fn merge_imported(&mut self, imported: &UserImport) {
        for (key, incoming) in &imported.read {
            match self.read.get(key) {
                None => {
                    self.read.insert(key.clone(), incoming.clone());
                }
                Some(existing) => {
                    if let (Some(a), Some(b)) = (parse_when(incoming), parse_when(existing))
                        && a > b
                    {
                        self.read.insert(key.clone(), incoming.clone());
                    }
                }
            }
        }

        for (key, note) in &imported.comments {
            self.comments
                .entry(key.clone())
                .or_insert_with(|| note.clone());
        }

        if let Some(patch) = &imported.settings {
            patch.apply(&mut self.settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsPatch, UserImport, UserState};
    use chrono::{NaiveDateTime, Utc};

    fn at(s: &str) -> chrono::DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .expect("test timestamp")
            .and_utc()
    }

    #[test]
    fn toggle_records_then_removes() {
        let mut state = UserState::default();
        let now = at("2024-03-05T10:00:00");

        assert!(state.toggle_read("https://example.com/a", now));
        assert_eq!(
            state.read.get("https://example.com/a").map(String::as_str),
            Some("2024-03-05T10:00:00.000Z")
        );

        assert!(!state.toggle_read("https://example.com/a", now));
        assert!(state.read.is_empty());
    }

    #[test]
    fn empty_note_is_removed_not_stored() {
        let mut state = UserState::default();
        state.set_note("k", "  solid recon methodology  ");
        assert_eq!(state.note("k"), Some("solid recon methodology"));

        state.set_note("k", "   ");
        assert_eq!(state.note("k"), None);
        assert!(state.comments.is_empty());
    }

    #[test]
    fn merge_read_is_last_write_wins_by_recency() {
        let mut state = UserState::default();
        state.read.insert("a".into(), "2024-03-05T10:00:00Z".into());
        state.read.insert("b".into(), "2024-03-05T10:00:00Z".into());

        let mut imported = UserImport::default();
        imported.read.insert("a".into(), "2024-03-06T10:00:00Z".into()); // later: wins
        imported.read.insert("b".into(), "2024-03-01T10:00:00Z".into()); // earlier: ignored
        imported.read.insert("c".into(), "2024-02-01T10:00:00Z".into()); // new: inserted

        state.merge_imported(&imported);
        assert_eq!(state.read["a"], "2024-03-06T10:00:00Z");
        assert_eq!(state.read["b"], "2024-03-05T10:00:00Z");
        assert_eq!(state.read["c"], "2024-02-01T10:00:00Z");
    }

    #[test]
    fn merge_unparsable_incoming_timestamp_keeps_existing() {
        let mut state = UserState::default();
        state.read.insert("a".into(), "2024-03-05T10:00:00Z".into());

        let mut imported = UserImport::default();
        imported.read.insert("a".into(), "whenever".into());

        state.merge_imported(&imported);
        assert_eq!(state.read["a"], "2024-03-05T10:00:00Z");
    }

    #[test]
    fn merge_notes_never_overwrite_local() {
        let mut state = UserState::default();
        state.set_note("a", "mine");

        let mut imported = UserImport::default();
        imported.comments.insert("a".into(), "theirs".into());
        imported.comments.insert("b".into(), "new".into());

        state.merge_imported(&imported);
        assert_eq!(state.note("a"), Some("mine"));
        assert_eq!(state.note("b"), Some("new"));
    }

    #[test]
    fn merge_settings_is_a_shallow_patch() {
        let mut state = UserState::default();
        state.settings.weekly_goal = 25;

        let imported = UserImport {
            settings: Some(SettingsPatch {
                dark: Some(true),
                ..SettingsPatch::default()
            }),
            ..UserImport::default()
        };

        state.merge_imported(&imported);
        assert!(state.settings.dark);
        // Absent incoming keys keep local values.
        assert_eq!(state.settings.weekly_goal, 25);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut imported = UserImport::default();
        imported.read.insert("a".into(), "2024-03-06T10:00:00Z".into());
        imported.comments.insert("a".into(), "note".into());
        imported.settings = Some(SettingsPatch {
            weekly_goal: Some(5),
            ..SettingsPatch::default()
        });

        let mut once = UserState::default();
        once.merge_imported(&imported);

        let mut twice = once.clone();
        twice.merge_imported(&imported);

        assert_eq!(once, twice);
    }

    #[test]
    fn settings_accept_original_field_spellings() {
        let json = r#"{"dark": true, "sort": "bounty_desc", "weeklyGoal": 3, "showOpen": false}"#;
        let settings: Settings = serde_json::from_str(json).expect("parsable");
        assert!(settings.dark);
        assert_eq!(settings.weekly_goal, 3);
        assert!(!settings.show_open);
    }

    #[test]
    fn user_state_defaults_match_first_run_document() {
        let state: UserState = serde_json::from_str("{}").expect("parsable");
        assert!(state.read.is_empty());
        assert!(state.comments.is_empty());
        assert_eq!(state.settings, Settings::default());
        assert_eq!(state.settings.weekly_goal, 10);
        assert!(state.settings.show_open);
    }
}
