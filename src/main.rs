use chrono::{Datelike, Local};
use clap::Parser;
use edgar_report::{
    generate_report, EngineMode, NarrativeConfig, ReportOptions, Result, RowSource,
    WarehouseConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate the EDGAR monthly S-1/F-1 filing-agent report PDF
#[derive(Parser, Debug)]
#[command(name = "edgar-report")]
#[command(about = "Generate the EDGAR monthly S-1/F-1 filing-agent report PDF")]
#[command(version)]
struct Args {
    /// Calendar year to report on (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Output PDF path, or a directory to receive edgar_s1_f1_report_<year>.pdf
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Read filings from a local CSV extract instead of BigQuery
    #[arg(long = "from-csv")]
    from_csv: Option<PathBuf>,

    /// BigQuery project id
    #[arg(long, default_value = "sec-edgar-ralph")]
    project: String,

    /// BigQuery dataset
    #[arg(long, default_value = "edgar")]
    dataset: String,

    /// BigQuery fact table of enriched filings
    #[arg(long, default_value = "fact_filing_enriched")]
    table: String,

    /// BigQuery location
    #[arg(long, default_value = "US")]
    location: String,

    /// PDF renderer: auto (prefer WeasyPrint), simple (built-in fallback), or weasyprint only
    #[arg(long = "pdf-engine", value_enum, default_value_t = EngineMode::Auto)]
    pdf_engine: EngineMode,

    /// Treat all 12 months as completed regardless of data or calendar
    #[arg(long)]
    force_full_year: bool,
}

fn resolve_output_path(output: &Path, year: i32) -> Result<PathBuf> {
    let is_pdf = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        return Ok(output.to_path_buf());
    }

    fs::create_dir_all(output)?;
    Ok(output.join(format!("edgar_s1_f1_report_{year}.pdf")))
}

fn run(args: Args) -> Result<()> {
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let source = match args.from_csv {
        Some(path) => RowSource::Csv(path),
        None => RowSource::Warehouse(WarehouseConfig {
            project: args.project,
            dataset: args.dataset,
            table: args.table,
            location: args.location,
            report_year: year,
        }),
    };

    let options = ReportOptions {
        report_year: year,
        engine: args.pdf_engine,
        force_full_year: args.force_full_year,
        narrative: NarrativeConfig::from_env(),
    };

    let output_path = resolve_output_path(&args.output, year)?;
    let engine = generate_report(&source, &options, &output_path)?;
    println!("Report created: {} (engine: {engine})", output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_pdf_path_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("monthly.pdf");
        let resolved = resolve_output_path(&target, 2026).unwrap();
        assert_eq!(resolved, target);
    }

    #[test]
    fn test_directory_output_gets_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");
        let resolved = resolve_output_path(&target, 2026).unwrap();
        assert_eq!(resolved, target.join("edgar_s1_f1_report_2026.pdf"));
        assert!(target.is_dir());
    }

    #[test]
    fn test_pdf_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("deep").join("monthly.pdf");
        let resolved = resolve_output_path(&target, 2026).unwrap();
        assert_eq!(resolved, target);
        assert!(target.parent().unwrap().is_dir());
    }
}
