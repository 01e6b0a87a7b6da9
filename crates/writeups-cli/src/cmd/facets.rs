//! `wu facets` — distinct authors, programs, and tags for filter building.

use std::io::Write;
use std::path::Path;

use clap::Args;

use writeups_core::filter::facet_options;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct FacetsArgs {}

pub fn run_facets(_args: &FacetsArgs, output: OutputMode, data_dir: &Path) -> anyhow::Result<()> {
    let session = super::open_session(data_dir)?;
    let facets = facet_options(session.writeups());

    render(output, &facets, |facets, w| {
        let section = |w: &mut dyn Write, name: &str, values: &[String]| {
            writeln!(w, "{name} ({})", values.len())?;
            for value in values {
                writeln!(w, "  {value}")?;
            }
            Ok::<(), std::io::Error>(())
        };
        section(w, "authors", &facets.authors)?;
        section(w, "programs", &facets.programs)?;
        section(w, "tags", &facets.tags)
    })
}
