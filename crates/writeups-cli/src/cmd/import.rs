//! `wu import` — merge a previously exported document into local state.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use writeups_core::error::ErrorCode;

use crate::output::{CliError, OutputMode, render_error, render_success};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// The exported JSON document to merge.
    pub file: PathBuf,
}

pub fn run_import(args: &ImportArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut session = super::open_session(data_dir)?;
    if let Err(err) = session.import_merge(&text) {
        render_error(output, &CliError::from_code(ErrorCode::ImportInvalid, format!("{err:#}")))?;
        anyhow::bail!("import failed");
    }

    let state = session.state();
    render_success(
        output,
        &format!(
            "imported: {} read marks, {} notes",
            state.read.len(),
            state.comments.len()
        ),
    )
}
