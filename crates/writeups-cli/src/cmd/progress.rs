//! `wu progress` — overall and weekly read progress.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use clap::Args;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct ProgressArgs {}

pub fn run_progress(_args: &ProgressArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;
    let report = session.progress(Utc::now());

    render(output, &report, |report, w| {
        writeln!(
            w,
            "read {} of {} write-ups ({}%)",
            report.read, report.total, report.percent
        )?;
        writeln!(
            w,
            "this week: {} of {} goal ({}%) {}",
            report.week_read,
            report.weekly_goal,
            report.week_percent,
            progress_bar(report.week_percent)
        )
    })
}

/// A 20-cell bar, filled proportionally to `percent` (already capped at 100).
fn progress_bar(percent: u32) -> String {
    const CELLS: u32 = 20;
    let filled = (percent * CELLS / 100) as usize;
    let mut bar = String::with_capacity(CELLS as usize + 2);
    bar.push('[');
    for i in 0..CELLS as usize {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}
