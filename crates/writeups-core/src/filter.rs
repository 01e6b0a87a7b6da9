//! The filter/sort/paginate pipeline.
//!
//! Filtering is a conjunction of independent predicates; each is a no-op
//! when its criterion is empty. Multi-select fields pass when the item's
//! list intersects the selected set (OR within a field, AND across fields).
//! Sorts are stable, so ties keep their pre-sort relative order.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::ledger::{ReadMap, Settings};
use crate::model::{DateField, SortMode, Writeup, utc_day};

/// Fixed page size for all list views.
pub const PAGE_SIZE: usize = 25;
/// Maximum numbered page buttons in a pagination window.
pub const PAGE_WINDOW: usize = 9;

/// The active filter/sort/search criteria for one query.
///
/// Session-only; not persisted. `sort` is seeded from [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub authors: BTreeSet<String>,
    pub programs: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub min_bounty: Option<u64>,
    pub max_bounty: Option<u64>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub date_field: DateField,
    pub search: String,
    pub unread_only: bool,
    pub sort: SortMode,
}

impl FilterState {
    /// A fresh filter with defaults seeded from persisted settings.
    #[must_use]
    pub fn seeded(settings: &Settings) -> Self {
        Self {
            sort: settings.sort,
            ..Self::default()
        }
    }
}

/// Apply the full pipeline: filter, then search, then a stable sort.
#[must_use]
pub fn apply<'a>(items: &'a [Writeup], filter: &FilterState, read: &ReadMap) -> Vec<&'a Writeup> {
    let term = filter.search.trim().to_lowercase();
    let mut matched: Vec<&Writeup> = items
        .iter()
        .filter(|w| passes(w, filter, read))
        .filter(|w| term.is_empty() || haystack(w).contains(&term))
        .collect();
    sort_writeups(&mut matched, filter.sort);
    matched
}

fn passes(w: &Writeup, filter: &FilterState, read: &ReadMap) -> bool {
    if filter.unread_only && read.contains_key(&w.identity_key()) {
        return false;
    }

    if !intersects(&filter.authors, &w.authors)
        || !intersects(&filter.programs, &w.programs)
        || !intersects(&filter.tags, &w.tags)
    {
        return false;
    }

    // Missing bounty compares as zero; bounds are inclusive.
    let bounty = w.bounty_num.unwrap_or(0);
    if filter.min_bounty.is_some_and(|min| bounty < min)
        || filter.max_bounty.is_some_and(|max| bounty > max)
    {
        return false;
    }

    // Items with an unparsable or absent date bypass the date filter.
    let raw_date = match filter.date_field {
        DateField::Publication => &w.date,
        DateField::Added => &w.added_date,
    };
    if let Some(day) = utc_day(raw_date)
        && (filter.min_date.is_some_and(|min| day < min)
            || filter.max_date.is_some_and(|max| day > max))
    {
        return false;
    }

    true
}

/// Empty selection passes everything; otherwise any shared value passes.
fn intersects(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}

/// The free-text search surface: title, authors, programs, tags,
/// description, and the raw bounty text.
fn haystack(w: &Writeup) -> String {
    format!(
        "{} {} {} {} {} {}",
        w.title,
        w.author_line(),
        w.programs.join(" "),
        w.tags.join(" "),
        w.desc,
        w.bounty_raw
    )
    .to_lowercase()
}

fn sort_writeups(items: &mut [&Writeup], mode: SortMode) {
    match mode {
        SortMode::DateDesc => items.sort_by(|a, b| b.publication_ts().cmp(&a.publication_ts())),
        SortMode::DateAsc => items.sort_by(|a, b| a.publication_ts().cmp(&b.publication_ts())),
        SortMode::Title => items.sort_by(|a, b| a.title.cmp(&b.title)),
        SortMode::Author => items.sort_by(|a, b| a.author_line().cmp(&b.author_line())),
        SortMode::BountyDesc => {
            items.sort_by(|a, b| b.bounty_num.unwrap_or(0).cmp(&a.bounty_num.unwrap_or(0)));
        }
        SortMode::BountyAsc => {
            items.sort_by(|a, b| a.bounty_num.unwrap_or(0).cmp(&b.bounty_num.unwrap_or(0)));
        }
    }
}

/// Pagination facts for one query result, enough to drive a page-window
/// control with prev/next affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Clamped zero-based page index.
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    /// Zero-based slice bounds into the matched set.
    pub start: usize,
    pub end: usize,
    /// Inclusive window of numbered pages to show, at most [`PAGE_WINDOW`].
    pub window_from: usize,
    pub window_to: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Total pages at [`PAGE_SIZE`]; an empty result still has one page.
#[must_use]
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Clamp a requested page index into the valid range for `total` items.
#[must_use]
pub fn clamp_page(requested: usize, total: usize) -> usize {
    requested.min(page_count(total) - 1)
}

/// Compute pagination facts for `total` matching items at `requested` page.
#[must_use]
pub fn page_info(total: usize, requested: usize) -> PageInfo {
    let pages = page_count(total);
    let page = clamp_page(requested, total);
    let start = (page * PAGE_SIZE).min(total);
    let end = ((page + 1) * PAGE_SIZE).min(total);

    // Window of up to PAGE_WINDOW pages centered on the current page,
    // clamped at the collection edges.
    let mut from = page.saturating_sub(PAGE_WINDOW / 2);
    let to = (from + PAGE_WINDOW - 1).min(pages - 1);
    if to - from < PAGE_WINDOW - 1 {
        from = to.saturating_sub(PAGE_WINDOW - 1);
    }

    PageInfo {
        page,
        pages,
        total,
        start,
        end,
        window_from: from,
        window_to: to,
        has_prev: page > 0,
        has_next: page + 1 < pages,
    }
}

/// Slice one page out of a matched set.
#[must_use]
pub fn page_slice<'a, 'b>(matched: &'b [&'a Writeup], info: PageInfo) -> &'b [&'a Writeup] {
    &matched[info.start..info.end]
}

/// Distinct filterable values observed in a catalog, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub authors: Vec<String>,
    pub programs: Vec<String>,
    pub tags: Vec<String>,
}

/// Collect the distinct author/program/tag values for filter pickers.
#[must_use]
pub fn facet_options(items: &[Writeup]) -> FacetOptions {
    let mut authors = BTreeSet::new();
    let mut programs = BTreeSet::new();
    let mut tags = BTreeSet::new();
    for w in items {
        authors.extend(w.authors.iter().cloned());
        programs.extend(w.programs.iter().cloned());
        tags.extend(w.tags.iter().cloned());
    }
    FacetOptions {
        authors: authors.into_iter().collect(),
        programs: programs.into_iter().collect(),
        tags: tags.into_iter().collect(),
    }
}
