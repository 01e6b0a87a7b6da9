//! Record normalization.
//!
//! Catalog sources disagree on field names and shapes, so every field is
//! mapped through an explicit fallback chain: an ordered list of candidate
//! source keys, first present wins. A record that matches nothing still
//! normalizes, just with defaults, and a payload that is not a recognizable
//! collection yields an empty catalog rather than an error.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::bounty::parse_bounty;
use crate::model::Writeup;

const TITLE_KEYS: &[&str] = &["Name", "title"];
const TITLE_LAST_RESORT_KEYS: &[&str] = &["Subject"];
const URL_KEYS: &[&str] = &["Link", "url"];
const TAG_KEYS: &[&str] = &["Bugs", "tags"];
const BOUNTY_KEYS: &[&str] = &["Bounty", "bounty"];
const ADDED_DATE_KEYS: &[&str] = &["AddedDate", "date", "PublicationDate"];
const PUBLICATION_DATE_KEYS: &[&str] = &["PublicationDate", "date"];
const SOURCE_KEYS: &[&str] = &["Source"];
const DESC_KEYS: &[&str] = &["Summary", "Description", "desc"];

/// Parse a raw catalog payload into normalized write-ups.
///
/// Accepts a JSON array, a `{"data": [...]}` envelope, or any object whose
/// first array-valued member looks like the record list. Anything else
/// (including unparsable JSON) yields an empty collection.
#[must_use]
pub fn parse_catalog(raw: &str) -> Vec<Writeup> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "catalog payload is not valid JSON");
            return Vec::new();
        }
    };

    let records = unwrap_envelope(value);
    let writeups: Vec<Writeup> = records.iter().filter_map(normalize_record).collect();
    debug!(count = writeups.len(), "normalized catalog records");
    writeups
}

/// Unwrap the record list from whatever envelope the source used.
fn unwrap_envelope(value: Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            if let Some(Value::Array(records)) = map.remove("data") {
                return records;
            }
            // Best effort: take the first array-valued member.
            map.into_iter()
                .find_map(|(_, v)| match v {
                    Value::Array(records) => Some(records),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

fn normalize_record(record: &Value) -> Option<Writeup> {
    let rec = record.as_object()?;
    let link = first_link(rec);

    let url = link
        .and_then(|l| scalar_string(l.get("Link")?))
        .or_else(|| first_string(rec, URL_KEYS))
        .unwrap_or_default();

    let title = first_string(rec, TITLE_KEYS)
        .or_else(|| link.and_then(|l| scalar_string(l.get("Title")?)))
        .or_else(|| first_string(rec, TITLE_LAST_RESORT_KEYS))
        .unwrap_or_else(|| "Untitled".to_string());

    let tags = dedup(string_list(rec, TAG_KEYS));

    let authors = match rec.get("Authors").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list.iter().filter_map(scalar_string).collect(),
        _ => rec
            .get("author")
            .and_then(scalar_string)
            .map(|a| vec![a])
            .unwrap_or_default(),
    };
    let authors = dedup(clean_names(authors));

    let programs = match rec.get("Programs").and_then(Value::as_array) {
        Some(list) => list.iter().filter_map(scalar_string).collect(),
        None => rec
            .get("Program")
            .and_then(scalar_string)
            .map(|p| vec![p])
            .unwrap_or_default(),
    };
    let programs = dedup(drop_placeholders(clean_names(programs)));

    let bounty_raw = first_string(rec, BOUNTY_KEYS).unwrap_or_default();
    let bounty_num = parse_bounty(Some(&bounty_raw));

    let added_date = first_string(rec, ADDED_DATE_KEYS).unwrap_or_default();
    let date = first_string(rec, PUBLICATION_DATE_KEYS).unwrap_or_else(|| added_date.clone());

    let source =
        first_string(rec, SOURCE_KEYS).unwrap_or_else(|| host_of(&url));

    Some(Writeup {
        title,
        url,
        tags,
        authors,
        programs,
        date,
        added_date,
        source,
        desc: first_string(rec, DESC_KEYS).unwrap_or_default(),
        bounty_raw,
        bounty_num,
    })
}

/// First element of the record's `Links` array, if any.
fn first_link(rec: &Map<String, Value>) -> Option<&Map<String, Value>> {
    rec.get("Links")?.as_array()?.first()?.as_object()
}

/// First candidate key holding a non-empty scalar.
fn first_string(rec: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| rec.get(*key).and_then(scalar_string))
}

/// First candidate key holding an array, lifted into trimmed strings.
///
/// An empty array still wins over later candidates; presence decides.
fn string_list(rec: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    for key in keys {
        if let Some(list) = rec.get(*key).and_then(Value::as_array) {
            return clean_names(list.iter().filter_map(scalar_string).collect());
        }
    }
    Vec::new()
}

/// A string or number rendered as a non-empty string.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn clean_names(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn drop_placeholders(list: Vec<String>) -> Vec<String> {
    list.into_iter().filter(|s| s != "-").collect()
}

/// Deduplicate by first occurrence, preserving order.
fn dedup(list: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    list.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

/// Hostname of a URL with a leading `www.` removed; empty on malformed URLs.
fn host_of(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .map(|host| host.strip_prefix("www.").unwrap_or(&host).to_string())
        .unwrap_or_default()
}
