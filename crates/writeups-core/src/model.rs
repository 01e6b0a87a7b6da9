use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A normalized security write-up record.
///
/// Immutable after normalization; every field has a safe default so
/// downstream logic never needs null checks. Dates are kept as the
/// best-effort strings the source provided and parsed lazily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Writeup {
    pub title: String,
    pub url: String,
    /// Bug classes, deduplicated, in source order.
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub programs: Vec<String>,
    /// Publication date, best effort.
    pub date: String,
    /// Catalog ingestion date.
    pub added_date: String,
    /// Site/hostname the write-up lives on.
    pub source: String,
    pub desc: String,
    pub bounty_raw: String,
    /// Parsed bounty; `None` iff no positive amount exists in `bounty_raw`.
    pub bounty_num: Option<u64>,
}

impl Writeup {
    /// The stable key joining a write-up with per-user read/note state.
    ///
    /// The URL when non-empty, else `"title:" + title`. Deterministic and
    /// derivable from the write-up alone, so it survives catalog refreshes.
    #[must_use]
    pub fn identity_key(&self) -> String {
        if self.url.is_empty() {
            format!("title:{}", self.title)
        } else {
            self.url.clone()
        }
    }

    /// All authors joined for display and search.
    #[must_use]
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Publication instant as a unix timestamp; unparsable dates sort as 0.
    #[must_use]
    pub fn publication_ts(&self) -> i64 {
        parse_when(&self.date).map_or(0, |dt| dt.timestamp())
    }
}

/// Parse a loosely formatted timestamp or date string into a UTC instant.
///
/// Accepts RFC 3339, bare `YYYY-MM-DDTHH:MM:SS[.frac]`, `YYYY-MM-DD`,
/// `MM/DD/YYYY`, and `Month DD, YYYY`. Anything else is `None`.
#[must_use]
pub fn parse_when(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// The UTC calendar day of a loosely formatted timestamp.
#[must_use]
pub fn utc_day(raw: &str) -> Option<NaiveDate> {
    parse_when(raw).map(|dt| dt.date_naive())
}

/// The six list orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    DateDesc,
    DateAsc,
    Title,
    Author,
    BountyDesc,
    BountyAsc,
}

impl SortMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::Title => "title",
            Self::Author => "author",
            Self::BountyDesc => "bounty_desc",
            Self::BountyAsc => "bounty_asc",
        }
    }
}

/// Which date a date-range filter compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    #[default]
    Publication,
    Added,
}

impl DateField {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Publication => "publication",
            Self::Added => "added",
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for SortMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "date_desc" => Ok(Self::DateDesc),
            "date_asc" => Ok(Self::DateAsc),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "bounty_desc" => Ok(Self::BountyDesc),
            "bounty_asc" => Ok(Self::BountyAsc),
            _ => Err(ParseEnumError {
                expected: "sort mode",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for DateField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "publication" => Ok(Self::Publication),
            "added" => Ok(Self::Added),
            _ => Err(ParseEnumError {
                expected: "date field",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DateField, SortMode, Writeup, parse_when, utc_day};
    use std::str::FromStr;

    #[test]
    fn identity_key_prefers_url() {
        let w = Writeup {
            title: "IDOR in billing".to_string(),
            url: "https://example.com/idor".to_string(),
            ..Writeup::default()
        };
        assert_eq!(w.identity_key(), "https://example.com/idor");
    }

    #[test]
    fn identity_key_falls_back_to_title() {
        let w = Writeup {
            title: "IDOR in billing".to_string(),
            ..Writeup::default()
        };
        assert_eq!(w.identity_key(), "title:IDOR in billing");
    }

    #[test]
    fn identity_key_is_deterministic() {
        let w = Writeup {
            title: "Same".to_string(),
            url: "https://example.com/x".to_string(),
            ..Writeup::default()
        };
        assert_eq!(w.identity_key(), w.clone().identity_key());
    }

    #[test]
    fn parse_when_accepts_common_shapes() {
        assert!(parse_when("2024-03-05T12:30:00Z").is_some());
        assert!(parse_when("2024-03-05T12:30:00.123Z").is_some());
        assert!(parse_when("2024-03-05T12:30:00").is_some());
        assert!(parse_when("2024-03-05").is_some());
        assert!(parse_when("03/05/2024").is_some());
        assert!(parse_when("March 5, 2024").is_some());
    }

    #[test]
    fn parse_when_rejects_garbage() {
        assert!(parse_when("").is_none());
        assert!(parse_when("soon").is_none());
        assert!(parse_when("2024-13-40").is_none());
    }

    #[test]
    fn utc_day_buckets_by_calendar_day() {
        let day = utc_day("2024-03-05T23:59:59Z").expect("parsable");
        assert_eq!(day.to_string(), "2024-03-05");
    }

    #[test]
    fn unparsable_publication_sorts_as_epoch() {
        let w = Writeup {
            date: "not a date".to_string(),
            ..Writeup::default()
        };
        assert_eq!(w.publication_ts(), 0);
    }

    #[test]
    fn sort_mode_round_trips() {
        for mode in [
            SortMode::DateDesc,
            SortMode::DateAsc,
            SortMode::Title,
            SortMode::Author,
            SortMode::BountyDesc,
            SortMode::BountyAsc,
        ] {
            let rendered = mode.to_string();
            assert_eq!(SortMode::from_str(&rendered), Ok(mode));
        }
        assert_eq!(
            serde_json::to_string(&SortMode::DateDesc).expect("serializable"),
            "\"date_desc\""
        );
        assert!(SortMode::from_str("newest").is_err());
    }

    #[test]
    fn date_field_round_trips() {
        for field in [DateField::Publication, DateField::Added] {
            let rendered = field.to_string();
            assert_eq!(DateField::from_str(&rendered), Ok(field));
        }
        assert!(DateField::from_str("updated").is_err());
    }
}
