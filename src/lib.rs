//! Per-core CPU utilization averages from `mpstat`-style sampling logs.
//!
//! Header lines (anything containing `CPU`) are skipped. Every other line must
//! hold exactly 8 whitespace-separated fields: field 1 is the core id and
//! field 7 the idle percentage. Utilization is `100 - idle`.

pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod report;

use std::path::Path;

pub use config::{Config, OutputFormat};
pub use error::{ReportError, Result};
pub use monitor::{Aggregator, Sample, SampleReader};
pub use report::Report;

/// Read the whole log at `path` and build its report.
///
/// The first I/O or format error aborts the run; no partial report is returned.
pub fn analyze<P: AsRef<Path>>(path: P) -> Result<Report> {
    let reader = SampleReader::open(path)?;
    let mut aggregator = Aggregator::new();
    aggregator.consume(reader)?;
    Ok(Report::from_aggregator(aggregator))
}
