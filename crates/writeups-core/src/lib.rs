//! writeups-core library.
//!
//! The catalog engine behind the `wu` CLI: record normalization, the
//! filter/sort/paginate pipeline, the per-user read/note ledger, and the
//! read-activity heatmap aggregator.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at I/O seams, typed errors where callers
//!   need to branch on the failure.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Dates**: all day bucketing happens in UTC.

pub mod bounty;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod heatmap;
pub mod ledger;
pub mod model;
pub mod normalize;
pub mod session;
pub mod store;
