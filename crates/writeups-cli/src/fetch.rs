//! HTTP access to the catalog source.
//!
//! The only networked code in the workspace. No retries: a failed fetch is
//! reported and the local cache is left untouched.

use anyhow::{Context, Result};
use std::io::Read;
use tracing::info;

/// Cap on a catalog payload; anything bigger is almost certainly not the
/// record list we asked for.
const MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Fetch the raw catalog payload from `url`.
pub fn fetch_catalog(url: &str) -> Result<String> {
    info!(url, "fetching catalog");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if status != 200 {
        anyhow::bail!("catalog source answered with status {status}");
    }

    let mut raw = String::new();
    response
        .into_reader()
        .take(MAX_PAYLOAD_BYTES)
        .read_to_string(&mut raw)
        .context("failed to read catalog response body")?;
    Ok(raw)
}
