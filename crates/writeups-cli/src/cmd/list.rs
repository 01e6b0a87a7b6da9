//! `wu list` — filter, sort, and paginate the catalog.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use writeups_core::filter::{self, FilterState, PageInfo};
use writeups_core::model::{DateField, SortMode, Writeup};
use writeups_core::session::Session;
use writeups_core::store::StateStore;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Free-text search over title, authors, programs, tags, and summary.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show write-ups not yet marked read.
    #[arg(short, long)]
    pub unread: bool,

    /// Filter by author (repeatable; any match passes).
    #[arg(short, long)]
    pub author: Vec<String>,

    /// Filter by program (repeatable; any match passes).
    #[arg(short, long)]
    pub program: Vec<String>,

    /// Filter by bug class tag (repeatable; any match passes).
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Minimum bounty in whole dollars (missing bounty counts as 0).
    #[arg(long)]
    pub min_bounty: Option<u64>,

    /// Maximum bounty in whole dollars.
    #[arg(long)]
    pub max_bounty: Option<u64>,

    /// Earliest date, YYYY-MM-DD (inclusive).
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Latest date, YYYY-MM-DD (inclusive).
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Which date the range compares: publication or added.
    #[arg(long, default_value = "publication")]
    pub date_field: String,

    /// Sort order: date_desc, date_asc, title, author, bounty_desc, bounty_asc.
    /// Defaults to the persisted setting.
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number, 1-based. Out-of-range values clamp to the last page.
    #[arg(long, default_value = "1")]
    pub page: usize,
}

/// One list row, stable for JSON consumers.
#[derive(Debug, Serialize)]
struct ListRow {
    key: String,
    title: String,
    url: String,
    source: String,
    date: String,
    authors: Vec<String>,
    programs: Vec<String>,
    tags: Vec<String>,
    bounty: Option<u64>,
    read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListReport {
    #[serde(flatten)]
    page: PageInfo,
    items: Vec<ListRow>,
}

pub fn run_list(
    args: &ListArgs,
    output: OutputMode,
    data_dir: &Path,
) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;
    let filter = filter_from_args(args, &session)?;

    let matched = session.query(&filter);
    let info = filter::page_info(matched.len(), args.page.saturating_sub(1));
    let rows: Vec<ListRow> = filter::page_slice(&matched, info)
        .iter()
        .map(|w| row_for(w, &session))
        .collect();

    let report = ListReport { page: info, items: rows };
    render(output, &report, |report, w| render_list_human(report, w))
}

fn filter_from_args<S: StateStore>(
    args: &ListArgs,
    session: &Session<S>,
) -> anyhow::Result<FilterState> {
    let mut filter = FilterState::seeded(&session.state().settings);
    if let Some(raw) = &args.sort {
        filter.sort = SortMode::from_str(raw)?;
    }
    filter.authors = to_set(&args.author);
    filter.programs = to_set(&args.program);
    filter.tags = to_set(&args.tag);
    filter.min_bounty = args.min_bounty;
    filter.max_bounty = args.max_bounty;
    filter.min_date = args.since;
    filter.max_date = args.until;
    filter.date_field = DateField::from_str(&args.date_field)?;
    filter.search = args.search.clone().unwrap_or_default();
    filter.unread_only = args.unread;
    Ok(filter)
}

fn to_set(values: &[String]) -> BTreeSet<String> {
    values.iter().cloned().collect()
}

fn row_for<S: StateStore>(w: &Writeup, session: &Session<S>) -> ListRow {
    let key = w.identity_key();
    let state = session.state();
    ListRow {
        read: state.is_read(&key),
        note: state.note(&key).map(ToString::to_string),
        title: w.title.clone(),
        url: w.url.clone(),
        source: w.source.clone(),
        date: w.date.clone(),
        authors: w.authors.clone(),
        programs: w.programs.clone(),
        tags: w.tags.clone(),
        bounty: w.bounty_num,
        key,
    }
}

fn render_list_human(report: &ListReport, w: &mut dyn Write) -> std::io::Result<()> {
    let info = &report.page;
    if info.total == 0 {
        return writeln!(w, "No write-ups matched your filters and search term.");
    }

    writeln!(w, "{}–{} of {}", info.start + 1, info.end, info.total)?;
    writeln!(w)?;

    for row in &report.items {
        let marker = if row.read { "[x]" } else { "[ ]" };
        let bounty = row.bounty.map_or_else(String::new, format_bounty);
        writeln!(w, "{marker} {}  {}  {bounty}", row.date, row.title)?;

        let mut meta = Vec::new();
        if !row.authors.is_empty() {
            meta.push(row.authors.join(", "));
        }
        if !row.programs.is_empty() {
            meta.push(row.programs.join(", "));
        }
        if !row.tags.is_empty() {
            meta.push(row.tags.join(" "));
        }
        if !row.source.is_empty() {
            meta.push(row.source.clone());
        }
        if !meta.is_empty() {
            writeln!(w, "      {}", meta.join(" · "))?;
        }
        if !row.url.is_empty() {
            writeln!(w, "      {}", row.url)?;
        }
        if let Some(note) = &row.note {
            writeln!(w, "      note: {note}")?;
        }
    }

    writeln!(w)?;
    writeln!(w, "{}", page_window_line(info))?;
    Ok(())
}

/// Render the pagination control, e.g. `< 3 4 [5] 6 7 >`.
fn page_window_line(info: &PageInfo) -> String {
    let mut parts = Vec::new();
    parts.push(if info.has_prev { "<".to_string() } else { "|".to_string() });
    for page in info.window_from..=info.window_to {
        if page == info.page {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push(format!("{}", page + 1));
        }
    }
    parts.push(if info.has_next { ">".to_string() } else { "|".to_string() });
    parts.join(" ")
}

/// `$2,500` style display with thousands separators.
fn format_bounty(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${grouped}")
}
