//! PDF rendering with two interchangeable backends.
//!
//! The rich backend lays the report out as styled HTML and drives the
//! WeasyPrint CLI; the built-in backend writes a minimal PDF directly with no
//! external dependency. Both produce the same logical content: title, the
//! full 12-month grid with totals, and the narrative section.

mod html;
mod simple;

pub use html::build_report_html;
pub use simple::build_pdf_bytes;

use crate::aggregate::ReportTable;
use crate::error::Result;
use clap::ValueEnum;
use log::{debug, info};
use std::fmt;
use std::path::Path;

/// Engine selection from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineMode {
    /// Prefer WeasyPrint, fall back silently to the built-in writer.
    Auto,
    /// Built-in writer only.
    Simple,
    /// WeasyPrint only; fail the run if it is unavailable.
    Weasyprint,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Auto => write!(f, "auto"),
            EngineMode::Simple => write!(f, "simple"),
            EngineMode::Weasyprint => write!(f, "weasyprint"),
        }
    }
}

/// Which backend actually produced the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Simple,
    Weasyprint,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Simple => write!(f, "simple"),
            Engine::Weasyprint => write!(f, "weasyprint"),
        }
    }
}

pub fn render_pdf(
    table: &ReportTable,
    narrative: &str,
    mode: EngineMode,
    output_path: &Path,
) -> Result<Engine> {
    if matches!(mode, EngineMode::Auto | EngineMode::Weasyprint) {
        match html::render_weasyprint(table, narrative, output_path) {
            Ok(()) => {
                info!("rendered {} with weasyprint", output_path.display());
                return Ok(Engine::Weasyprint);
            }
            Err(err) => {
                if mode == EngineMode::Weasyprint {
                    return Err(err);
                }
                debug!("weasyprint unavailable, using built-in renderer: {err}");
            }
        }
    }

    simple::render_simple(table, narrative, output_path)?;
    info!("rendered {} with built-in writer", output_path.display());
    Ok(Engine::Simple)
}
