//! `wu day` — list everything read on one calendar day.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct DayArgs {
    /// The day to inspect, YYYY-MM-DD (UTC).
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct DayRow {
    key: String,
    title: String,
    url: String,
    read_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct DayReport {
    date: NaiveDate,
    count: usize,
    items: Vec<DayRow>,
}

pub fn run_day(args: &DayArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;

    let items: Vec<DayRow> = session
        .reads_on(args.date)
        .into_iter()
        .map(|r| DayRow {
            key: r.item.identity_key(),
            title: r.item.title.clone(),
            url: r.item.url.clone(),
            read_at: r.read_at,
            note: r.note,
        })
        .collect();

    let report = DayReport {
        date: args.date,
        count: items.len(),
        items,
    };
    render(output, &report, |report, w| {
        if report.items.is_empty() {
            return writeln!(w, "nothing read on {}", report.date);
        }
        writeln!(w, "{} read on {}", report.count, report.date)?;
        for row in &report.items {
            writeln!(w, "  {}  {}", row.read_at, row.title)?;
            if !row.url.is_empty() {
                writeln!(w, "      {}", row.url)?;
            }
            if let Some(note) = &row.note {
                writeln!(w, "      note: {note}")?;
            }
        }
        Ok(())
    })
}
