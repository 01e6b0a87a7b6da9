//! `wu note` — set, show, or clear a per-item note.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::cmd::read::lookup_error;
use crate::output::{OutputMode, render, render_error, render_success};

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Identity key (the write-up's URL) or a unique title fragment.
    pub key: String,

    /// Note text. Omit to print the current note.
    pub text: Option<String>,

    /// Remove the note.
    #[arg(long, conflicts_with = "text")]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
struct NoteReport {
    key: String,
    note: Option<String>,
}

pub fn run_note(args: &NoteArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let mut session = super::open_session(data_dir)?;

    let key = match session.resolve_key(&args.key) {
        Ok(key) => key,
        Err(err) => {
            render_error(output, &lookup_error(&err))?;
            anyhow::bail!("could not resolve '{}'", args.key);
        }
    };

    if args.clear {
        session.set_note(&key, "")?;
        return render_success(output, &format!("note cleared: {key}"));
    }

    if let Some(text) = &args.text {
        session.set_note(&key, text)?;
        return render_success(output, &format!("note saved: {key}"));
    }

    let note = session.state().note(&key).map(ToString::to_string);
    let report = NoteReport { key, note };
    render(output, &report, |report, w| {
        match &report.note {
            Some(note) => writeln!(w, "{note}"),
            None => writeln!(w, "(no note)"),
        }
    })
}
