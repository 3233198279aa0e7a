use crate::calendar::parse_filing_date;
use crate::config::WarehouseConfig;
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One normalized filing row, whichever source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRecord {
    pub agent: String,
    pub filing_date: NaiveDate,
    pub form_type: String,
    pub accession_number: String,
}

/// Where filing rows come from for this run.
#[derive(Debug, Clone)]
pub enum RowSource {
    Csv(PathBuf),
    Warehouse(WarehouseConfig),
}

impl RowSource {
    pub fn load(&self) -> Result<Vec<FilingRecord>> {
        match self {
            RowSource::Csv(path) => load_from_csv(path),
            RowSource::Warehouse(config) => load_from_warehouse(config),
        }
    }
}

/// Column layout of an input CSV, resolved from its header row.
struct ColumnMap {
    standardized_name: Option<usize>,
    company_name: Option<usize>,
    filing_date: usize,
    form_type: usize,
    accession_number: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let standardized_name = position("standardized_name");
        let company_name = position("companyName");
        if standardized_name.is_none() && company_name.is_none() {
            return Err(ReportError::CsvMissingAgentColumn);
        }

        let mut missing = Vec::new();
        let filing_date = position("filingDate");
        let form_type = position("formType");
        let accession_number = position("accessionNumber");
        for (name, index) in [
            ("filingDate", filing_date),
            ("formType", form_type),
            ("accessionNumber", accession_number),
        ] {
            if index.is_none() {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(ReportError::CsvMissingColumns(missing));
        }

        Ok(Self {
            standardized_name,
            company_name,
            filing_date: filing_date.unwrap(),
            form_type: form_type.unwrap(),
            accession_number: accession_number.unwrap(),
        })
    }

    /// The standardized agent name, falling back to the raw company label.
    fn agent(&self, row: &csv::StringRecord) -> Option<String> {
        for index in [self.standardized_name, self.company_name].into_iter().flatten() {
            let value = row.get(index).unwrap_or("").trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        None
    }

    fn record(&self, row: &csv::StringRecord) -> Option<FilingRecord> {
        let agent = self.agent(row)?;
        let filing_date = parse_filing_date(row.get(self.filing_date)?)?;
        let form_type = row.get(self.form_type)?.trim();
        let accession_number = row.get(self.accession_number)?.trim();
        if accession_number.is_empty() {
            return None;
        }
        Some(FilingRecord {
            agent,
            filing_date,
            form_type: form_type.to_string(),
            accession_number: accession_number.to_string(),
        })
    }
}

/// Parses filing rows out of any CSV payload (local file or `bq` output).
/// Malformed data rows are skipped, never fatal; header problems are.
fn records_from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<FilingRecord>> {
    let headers = reader
        .headers()
        .map_err(|err| ReportError::DataSource(format!("unreadable CSV header: {err}")))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!("skipping malformed CSV row: {err}");
                skipped += 1;
                continue;
            }
        };
        match columns.record(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("skipped {skipped} rows with missing or malformed fields");
    }
    Ok(records)
}

pub fn load_from_csv(path: &Path) -> Result<Vec<FilingRecord>> {
    if !path.is_file() {
        return Err(ReportError::CsvNotFound(path.to_path_buf()));
    }
    let reader = csv::Reader::from_path(path)
        .map_err(|err| ReportError::DataSource(format!("failed to open CSV: {err}")))?;
    let records = records_from_reader(reader)?;
    info!("loaded {} filing rows from {}", records.len(), path.display());
    Ok(records)
}

/// The single warehouse query: both the report year and the prior year, so
/// one round trip feeds the table and the continuity context.
pub fn warehouse_sql(config: &WarehouseConfig) -> String {
    let table_ref = format!("`{}.{}.{}`", config.project, config.dataset, config.table);
    format!(
        "SELECT\n  standardized_name,\n  companyName,\n  filingDate,\n  formType,\n  accessionNumber\n\
         FROM {table_ref}\n\
         WHERE EXTRACT(YEAR FROM filingDate) IN ({prior_year}, {report_year})\n  \
         AND (standardized_name IS NOT NULL OR companyName IS NOT NULL)\n  \
         AND accessionNumber IS NOT NULL\n\
         ORDER BY filingDate, standardized_name, accessionNumber",
        prior_year = config.report_year - 1,
        report_year = config.report_year,
    )
}

pub(crate) fn binary_on_path(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(name).is_file()))
        .unwrap_or(false)
}

/// Preflight check that the `bq` CLI is installed before issuing a query.
pub fn ensure_bq_cli() -> Result<()> {
    if binary_on_path("bq") {
        Ok(())
    } else {
        Err(ReportError::WarehouseCliMissing)
    }
}

pub fn load_from_warehouse(config: &WarehouseConfig) -> Result<Vec<FilingRecord>> {
    ensure_bq_cli()?;
    let sql = warehouse_sql(config);
    info!(
        "querying {}.{}.{} for {} and {}",
        config.project,
        config.dataset,
        config.table,
        config.report_year,
        config.report_year - 1
    );

    let output = Command::new("bq")
        .arg("query")
        .arg("--use_legacy_sql=false")
        .arg("--format=csv")
        .arg("--max_rows=1000000")
        .arg(format!("--location={}", config.location))
        .arg(format!("--project_id={}", config.project))
        .arg(&sql)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReportError::DataSource(format!(
            "BigQuery query failed. Ensure your account can access the table and \
             billing is enabled for the project. Error: {}",
            stderr.trim()
        )));
    }

    let reader = csv::Reader::from_reader(output.stdout.as_slice());
    let records = records_from_reader(reader)?;
    info!("loaded {} filing rows from BigQuery", records.len());
    Ok(records)
}
