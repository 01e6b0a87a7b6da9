//! `wu read` — toggle a write-up's read mark.

use std::path::Path;

use clap::Args;
use serde::Serialize;

use writeups_core::error::ErrorCode;
use writeups_core::session::KeyLookupError;

use crate::output::{CliError, OutputMode, render, render_error, render_success};

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Identity key (the write-up's URL) or a unique title fragment.
    pub key: String,
}

#[derive(Debug, Serialize)]
struct ReadReport {
    key: String,
    read: bool,
}

pub fn run_read(args: &ReadArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let mut session = super::open_session(data_dir)?;

    let key = match session.resolve_key(&args.key) {
        Ok(key) => key,
        Err(err) => {
            render_error(output, &lookup_error(&err))?;
            anyhow::bail!("could not resolve '{}'", args.key);
        }
    };

    let read = session.toggle_read(&key)?;
    if output.is_json() {
        return render(output, &ReadReport { key, read }, |_, _| Ok(()));
    }
    let verb = if read { "marked read" } else { "marked unread" };
    render_success(output, &format!("{verb}: {key}"))
}

/// Shared with `wu note`: map a lookup failure to a coded CLI error.
pub fn lookup_error(err: &KeyLookupError) -> CliError {
    match err {
        KeyLookupError::NotFound(_) => CliError::from_code(ErrorCode::ItemNotFound, err.to_string()),
        KeyLookupError::Ambiguous { matches, .. } => {
            let mut cli = CliError::from_code(ErrorCode::AmbiguousKey, err.to_string());
            let preview: Vec<&str> = matches.iter().take(5).map(String::as_str).collect();
            cli.suggestion = Some(format!("candidates: {}", preview.join(", ")));
            cli
        }
    }
}

#[cfg(test)]
mod tests {
    use super::lookup_error;
    use writeups_core::session::KeyLookupError;

    #[test]
    fn not_found_maps_to_e4001() {
        let cli = lookup_error(&KeyLookupError::NotFound("zzz".into()));
        assert_eq!(cli.error_code.as_deref(), Some("E4001"));
    }

    #[test]
    fn ambiguous_maps_to_e4002_with_candidates() {
        let cli = lookup_error(&KeyLookupError::Ambiguous {
            query: "s".into(),
            matches: vec!["https://a.example/1".into(), "https://a.example/2".into()],
        });
        assert_eq!(cli.error_code.as_deref(), Some("E4002"));
        assert!(cli.suggestion.as_deref().is_some_and(|s| s.contains("candidates")));
    }
}
