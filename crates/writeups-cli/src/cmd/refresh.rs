//! `wu refresh` — fetch the catalog and replace the local cache.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use writeups_core::catalog::DEFAULT_CATALOG_URL;
use writeups_core::error::ErrorCode;

use crate::fetch::fetch_catalog;
use crate::output::{CliError, OutputMode, render, render_error};

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Catalog source URL.
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub url: String,
}

#[derive(Debug, Serialize)]
struct RefreshReport {
    url: String,
    writeups: usize,
}

pub fn run_refresh(args: &RefreshArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let cache = super::catalog_cache(data_dir);

    let raw = match fetch_catalog(&args.url) {
        Ok(raw) => raw,
        Err(err) => {
            render_error(output, &CliError::from_code(ErrorCode::CatalogFetchFailed, err.to_string()))?;
            anyhow::bail!("refresh failed");
        }
    };

    if let Err(err) = cache.replace(&raw) {
        render_error(
            output,
            &CliError::from_code(ErrorCode::CatalogCacheWriteFailed, err.to_string()),
        )?;
        anyhow::bail!("refresh failed");
    }

    let report = RefreshReport {
        url: args.url.clone(),
        writeups: cache.load().len(),
    };
    render(output, &report, |report, w| {
        writeln!(w, "✓ cached {} write-ups from {}", report.writeups, report.url)
    })
}
