//! Read-activity heatmap aggregation.
//!
//! Buckets read events into UTC calendar days across a fixed grid of
//! Sunday-first week columns: at least [`GRID_WEEKS`] weeks, ending two
//! weeks past "today" so the current streak has room to grow. Intensity
//! levels adapt to the observed maximum daily count, so a light reader's
//! busiest day still renders at full intensity.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::ledger::{ReadMap, UserState};
use crate::model::{Writeup, utc_day};

/// Minimum number of week columns in the grid.
pub const GRID_WEEKS: usize = 54;
/// Days past "today" the grid extends.
pub const FUTURE_DAYS: u64 = 14;

/// Adaptive intensity thresholds derived from the maximum daily count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub t1: u32,
    pub t2: u32,
    pub t3: u32,
}

impl Thresholds {
    /// `t1 = max(1, ceil(0.25·M))`, `t2 = max(2, ceil(0.5·M))`,
    /// `t3 = max(3, ceil(0.75·M))` for maximum daily count `M`.
    #[must_use]
    pub fn from_max(max_count: u32) -> Self {
        let scaled = |factor: f64, floor: u32| -> u32 {
            ceil_u32(f64::from(max_count) * factor).max(floor)
        };
        Self {
            t1: scaled(0.25, 1),
            t2: scaled(0.5, 2),
            t3: scaled(0.75, 3),
        }
    }

    /// Map a day's count to an intensity level 0–4.
    #[must_use]
    pub const fn level(self, count: u32) -> u8 {
        if count == 0 {
            0
        } else if count >= self.t3 {
            4
        } else if count >= self.t2 {
            3
        } else if count >= self.t1 {
            2
        } else {
            1
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_u32(n: f64) -> u32 {
    n.ceil() as u32
}

/// A month transition label, positioned at the first week column whose
/// Sunday falls in that month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    /// Short month name, e.g. `Mar`.
    pub name: String,
    pub week_index: usize,
}

/// The aggregated calendar grid.
#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    /// Week columns, each exactly seven days, Sunday first.
    pub weeks: Vec<Vec<NaiveDate>>,
    /// Reads per UTC calendar day; days with zero reads are absent.
    pub counts: BTreeMap<NaiveDate, u32>,
    pub max_count: u32,
    pub thresholds: Thresholds,
    pub months: Vec<MonthLabel>,
}

impl Heatmap {
    #[must_use]
    pub fn count_on(&self, day: NaiveDate) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn level_on(&self, day: NaiveDate) -> u8 {
        self.thresholds.level(self.count_on(day))
    }
}

/// Build the heatmap grid for a read ledger, anchored at `today`.
#[must_use]
pub fn build(read: &ReadMap, today: NaiveDate) -> Heatmap {
    let end = today + Days::new(FUTURE_DAYS);
    let mut start = end - Days::new(GRID_WEEKS as u64 * 7);
    // Align the first column to a Sunday.
    start = start - Days::new(u64::from(start.weekday().num_days_from_sunday()));

    let mut weeks = Vec::with_capacity(GRID_WEEKS + 1);
    let mut cursor = start;
    while cursor <= end || weeks.len() < GRID_WEEKS {
        let week: Vec<NaiveDate> = (0..7)
            .map(|offset| cursor + Days::new(offset))
            .collect();
        cursor = cursor + Days::new(7);
        weeks.push(week);
    }

    let counts = day_counts(read);
    let max_count = counts.values().copied().max().unwrap_or(0);
    let thresholds = Thresholds::from_max(max_count);
    let months = month_labels(&weeks);

    Heatmap {
        weeks,
        counts,
        max_count,
        thresholds,
        months,
    }
}

/// Count read events per UTC calendar day; unparsable timestamps are skipped.
fn day_counts(read: &ReadMap) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for ts in read.values() {
        if let Some(day) = utc_day(ts) {
            *counts.entry(day).or_insert(0) += 1;
        }
    }
    counts
}

/// One label per distinct month transition across the week columns.
fn month_labels(weeks: &[Vec<NaiveDate>]) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut last_month = None;
    for (index, week) in weeks.iter().enumerate() {
        let Some(first) = week.first() else { continue };
        let month = first.month();
        if last_month != Some(month) {
            labels.push(MonthLabel {
                name: first.format("%b").to_string(),
                week_index: index,
            });
            last_month = Some(month);
        }
    }
    labels
}

/// One read event on a given day, with its note for drill-down views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRead<'a> {
    pub item: &'a Writeup,
    pub read_at: String,
    pub note: Option<String>,
}

/// Every read item whose read timestamp falls on `day` (UTC).
#[must_use]
pub fn reads_on<'a>(items: &'a [Writeup], state: &UserState, day: NaiveDate) -> Vec<DayRead<'a>> {
    items
        .iter()
        .filter_map(|w| {
            let key = w.identity_key();
            let ts = state.read.get(&key)?;
            (utc_day(ts)? == day).then(|| DayRead {
                item: w,
                read_at: ts.clone(),
                note: state.note(&key).map(ToString::to_string),
            })
        })
        .collect()
}

/// True when both instants fall in the same ISO week of the same ISO year.
#[must_use]
pub fn same_iso_week(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    let (wa, wb) = (a.iso_week(), b.iso_week());
    wa.year() == wb.year() && wa.week() == wb.week()
}

#[cfg(test)]
mod tests {
    use super::{FUTURE_DAYS, GRID_WEEKS, Thresholds, build, reads_on, same_iso_week};
    use crate::ledger::{ReadMap, UserState};
    use crate::model::{Writeup, parse_when};
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    fn day(s: &str) -> NaiveDate {
        s.parse().expect("test date")
    }

    #[test]
    fn empty_ledger_is_all_level_zero() {
        let map = build(&ReadMap::new(), day("2024-03-05"));
        assert_eq!(map.max_count, 0);
        for week in &map.weeks {
            for d in week {
                assert_eq!(map.level_on(*d), 0);
            }
        }
    }

    #[test]
    fn thresholds_for_max_one() {
        let t = Thresholds::from_max(1);
        assert_eq!((t.t1, t.t2, t.t3), (1, 2, 3));
        // A single read sits below t2, so it renders at level 2 (>= t1).
        assert_eq!(t.level(1), 2);
        assert_eq!(t.level(0), 0);
    }

    #[test]
    fn thresholds_for_max_four() {
        let t = Thresholds::from_max(4);
        assert_eq!((t.t1, t.t2, t.t3), (1, 2, 3));
        assert_eq!(t.level(4), 4);
        assert_eq!(t.level(3), 4);
        assert_eq!(t.level(2), 3);
        assert_eq!(t.level(1), 2);
    }

    #[test]
    fn thresholds_for_max_ten() {
        let t = Thresholds::from_max(10);
        assert_eq!((t.t1, t.t2, t.t3), (3, 5, 8));
        assert_eq!(t.level(10), 4);
        assert_eq!(t.level(8), 4);
        assert_eq!(t.level(7), 3);
        assert_eq!(t.level(5), 3);
        assert_eq!(t.level(4), 2);
        assert_eq!(t.level(3), 2);
        assert_eq!(t.level(2), 1);
        assert_eq!(t.level(1), 1);
    }

    #[test]
    fn grid_is_sunday_aligned_and_spans_the_window() {
        let today = day("2024-03-05");
        let map = build(&ReadMap::new(), today);

        assert!(map.weeks.len() >= GRID_WEEKS);
        for week in &map.weeks {
            assert_eq!(week.len(), 7);
            assert_eq!(week[0].weekday(), Weekday::Sun);
            assert_eq!(week[6].weekday(), Weekday::Sat);
        }

        let last_day = map.weeks.last().and_then(|w| w.last()).copied().expect("grid");
        assert!(last_day >= today + Days::new(FUTURE_DAYS));
    }

    #[test]
    fn counts_bucket_by_utc_day() {
        let mut read = ReadMap::new();
        read.insert("a".into(), "2024-03-05T23:59:00Z".into());
        read.insert("b".into(), "2024-03-05T00:01:00Z".into());
        read.insert("c".into(), "2024-03-06T12:00:00Z".into());
        read.insert("d".into(), "garbage".into()); // skipped

        let map = build(&read, day("2024-03-10"));
        assert_eq!(map.count_on(day("2024-03-05")), 2);
        assert_eq!(map.count_on(day("2024-03-06")), 1);
        assert_eq!(map.max_count, 2);
    }

    #[test]
    fn month_labels_mark_each_transition_once() {
        let map = build(&ReadMap::new(), day("2024-03-05"));
        // Consecutive labels never repeat a month name.
        for pair in map.months.windows(2) {
            assert_ne!(pair[0].name, pair[1].name);
            assert!(pair[0].week_index < pair[1].week_index);
        }
        // Roughly one label per month across a 54-week window.
        assert!(map.months.len() >= 12);
    }

    #[test]
    fn reads_on_returns_items_with_notes() {
        let items = vec![
            Writeup {
                title: "A".into(),
                url: "https://e.example/a".into(),
                ..Writeup::default()
            },
            Writeup {
                title: "B".into(),
                url: "https://e.example/b".into(),
                ..Writeup::default()
            },
        ];
        let mut state = UserState::default();
        state
            .read
            .insert("https://e.example/a".into(), "2024-03-05T10:00:00Z".into());
        state
            .read
            .insert("https://e.example/b".into(), "2024-03-06T10:00:00Z".into());
        state.set_note("https://e.example/a", "clever pivot");

        let reads = reads_on(&items, &state, day("2024-03-05"));
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].item.title, "A");
        assert_eq!(reads[0].note.as_deref(), Some("clever pivot"));

        assert!(reads_on(&items, &state, day("2024-03-04")).is_empty());
    }

    #[test]
    fn iso_week_comparison() {
        let a = parse_when("2024-03-04T00:00:00Z").expect("monday");
        let b = parse_when("2024-03-10T23:59:59Z").expect("sunday same iso week");
        let c = parse_when("2024-03-11T00:00:00Z").expect("next monday");
        assert!(same_iso_week(a, b));
        assert!(!same_iso_week(a, c));
    }
}
