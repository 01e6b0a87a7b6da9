//! `wu config` — show or update persisted settings.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use clap::Args;

use writeups_core::ledger::SettingsPatch;
use writeups_core::model::SortMode;

use crate::output::{OutputMode, render, render_success};

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Dark theme on or off.
    #[arg(long, value_name = "BOOL")]
    pub dark: Option<bool>,

    /// Default sort order for `wu list`.
    #[arg(long)]
    pub sort: Option<String>,

    /// Weekly reading goal.
    #[arg(long, value_name = "N")]
    pub weekly_goal: Option<u32>,

    /// Whether list output includes an "open in browser" hint.
    #[arg(long, value_name = "BOOL")]
    pub show_open: Option<bool>,
}

pub fn run_config(args: &ConfigArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let mut session = super::open_session(data_dir)?;

    let patch = SettingsPatch {
        dark: args.dark,
        sort: args.sort.as_deref().map(SortMode::from_str).transpose()?,
        weekly_goal: args.weekly_goal,
        show_open: args.show_open,
    };

    if patch.is_empty() {
        let settings = session.state().settings.clone();
        return render(output, &settings, |s, w| {
            writeln!(w, "dark        {}", s.dark)?;
            writeln!(w, "sort        {}", s.sort)?;
            writeln!(w, "weekly_goal {}", s.weekly_goal)?;
            writeln!(w, "show_open   {}", s.show_open)
        });
    }

    session.update_settings(&patch)?;
    render_success(output, "settings updated")
}
