//! `wu export` — write the full user state as JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run_export(args: &ExportArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;
    let exported = session.export_json()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &exported)
                .with_context(|| format!("failed to write {}", path.display()))?;
            render_success(output, &format!("exported to {}", path.display()))
        }
        None => {
            // The export is the payload, regardless of output mode.
            println!("{exported}");
            Ok(())
        }
    }
}
