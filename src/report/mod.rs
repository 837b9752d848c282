//! Report renderers for resolved dependencies.
//!
//! - [`terminal`]: colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - [`json`]: machine-readable dump of the whole report.

pub mod json;
pub mod terminal;

use serde::Serialize;

use crate::models::ReportEntry;

/// Everything a renderer needs.
#[derive(Debug, Serialize)]
pub struct Report {
    pub project_license: String,
    pub packages: Vec<ReportEntry>,
    /// Requirements nothing could resolve (offline mode only).
    pub unresolved: Vec<String>,
}
