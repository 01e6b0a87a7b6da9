//! `wu heatmap` — render the read-activity calendar grid.

use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;

use writeups_core::heatmap::{Heatmap, MonthLabel};

use crate::output::{OutputMode, render};

/// Intensity glyphs, level 0 through 4.
const LEVEL_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

const DAY_ROW_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// Anchor day, YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct HeatmapReport {
    today: NaiveDate,
    #[serde(flatten)]
    map: Heatmap,
}

pub fn run_heatmap(args: &HeatmapArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let map = session.heatmap(today);

    let report = HeatmapReport { today, map };
    render(output, &report, |report, w| {
        render_grid(&report.map, report.today, w)
    })
}

fn render_grid(map: &Heatmap, today: NaiveDate, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "    {}", month_ruler(&map.months, map.weeks.len()))?;

    for row in 0..7 {
        let mut line = String::with_capacity(map.weeks.len() + 4);
        line.push_str(DAY_ROW_LABELS[row]);
        line.push(' ');
        for week in &map.weeks {
            let day = week[row];
            if day == today {
                // The anchor day reads better boxed than shaded.
                line.push('◆');
            } else {
                line.push(LEVEL_GLYPHS[map.level_on(day) as usize]);
            }
        }
        writeln!(w, "{line}")?;
    }

    let t = map.thresholds;
    writeln!(w)?;
    writeln!(
        w,
        "less {} more  (1..<{} {}..<{} {}..<{} {}+ reads/day, max {})",
        LEVEL_GLYPHS.iter().collect::<String>(),
        t.t1,
        t.t1,
        t.t2,
        t.t2,
        t.t3,
        t.t3,
        map.max_count,
    )
}

/// Month names laid out over their starting week columns.
fn month_ruler(months: &[MonthLabel], weeks: usize) -> String {
    let mut ruler = vec![' '; weeks];
    for label in months {
        for (offset, c) in label.name.chars().enumerate() {
            let at = label.week_index + offset;
            if at < weeks {
                ruler[at] = c;
            }
        }
    }
    ruler.into_iter().collect::<String>().trim_end().to_string()
}
