//! # EDGAR Report
//!
//! A reporting utility that turns EDGAR registration-filing data into a
//! single landscape PDF: S-1/F-1 filings grouped by filing agent and month,
//! with row/column totals and an executive-summary narrative.
//!
//! ## Core Concepts
//!
//! - **Row sources**: a local CSV extract or a BigQuery fact table, both
//!   normalized into the same [`FilingRecord`] shape
//! - **Form buckets**: raw form types collapse to S-1 / F-1 (amendments
//!   included); everything else is excluded from the report
//! - **Dense matrix**: every agent row spans all 12 months, zero-filled, so
//!   the rendered grid is always a full Jan-Dec table
//! - **Completed months**: the narrative only discusses months that have
//!   finished reporting; later months are displayed for layout only
//! - **Narrative strategies**: a remote chat-completion call when a
//!   credential is configured, with a deterministic local fallback
//! - **Render engines**: WeasyPrint when available, a built-in PDF writer
//!   otherwise
//!
//! ## Example
//!
//! ```rust,ignore
//! use edgar_report::*;
//! use std::path::Path;
//!
//! let source = RowSource::Csv("filings_2026.csv".into());
//! let options = ReportOptions {
//!     report_year: 2026,
//!     engine: EngineMode::Auto,
//!     force_full_year: false,
//!     narrative: NarrativeConfig::from_env(),
//! };
//! let engine = generate_report(&source, &options, Path::new("report.pdf"))?;
//! ```

pub mod aggregate;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod narrative;
pub mod render;
pub mod source;

pub use aggregate::{build_report_table, AgentRow, ReportTable};
pub use calendar::{completed_month_count, validate_report_year, MONTH_LABELS};
pub use classify::FormBucket;
pub use config::{NarrativeConfig, WarehouseConfig};
pub use error::{ReportError, Result};
pub use render::{render_pdf, Engine, EngineMode};
pub use source::{FilingRecord, RowSource};

use chrono::Local;
use log::{debug, info};
use std::path::Path;

/// Per-run settings assembled once by the caller.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub report_year: i32,
    pub engine: EngineMode,
    pub force_full_year: bool,
    pub narrative: NarrativeConfig,
}

/// Runs the whole pipeline: load rows, aggregate the report year and the
/// prior year, resolve completed months, generate the narrative, render the
/// PDF. Returns the engine that produced the output file.
pub fn generate_report(
    source: &RowSource,
    options: &ReportOptions,
    output_path: &Path,
) -> Result<Engine> {
    validate_report_year(options.report_year)?;

    let records = source.load()?;
    let registrations: Vec<FilingRecord> = records
        .into_iter()
        .filter(|record| FormBucket::classify(&record.form_type).is_registration())
        .collect();
    info!(
        "{} S-1/F-1 rows after classification for the {} report",
        registrations.len(),
        options.report_year
    );

    let table = build_report_table(&registrations, options.report_year);
    let prior_table = build_report_table(&registrations, options.report_year - 1);

    let today = Local::now().date_naive();
    let completed_months = completed_month_count(
        &registrations,
        options.report_year,
        today,
        options.force_full_year,
    );
    debug!("completed months for {}: {}", options.report_year, completed_months);

    let prior_context = narrative::prior_year_context(&prior_table, completed_months);
    let narrative_text =
        narrative::generate(&table, completed_months, &prior_context, &options.narrative);

    render_pdf(&table, &narrative_text, options.engine, output_path)
}
