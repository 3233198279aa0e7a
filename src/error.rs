use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report year {0}: must be between 1994 and 2100")]
    InvalidReportYear(i32),

    #[error("Input CSV not found: {0}")]
    CsvNotFound(PathBuf),

    #[error("CSV is missing required columns: {0:?}")]
    CsvMissingColumns(Vec<String>),

    #[error("CSV must include `standardized_name` or `companyName`")]
    CsvMissingAgentColumn,

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error(
        "BigQuery mode requires the `bq` CLI, but it was not found in PATH. \
         Install the Google Cloud SDK, run `gcloud auth application-default login` \
         and `gcloud auth login`, then retry."
    )]
    WarehouseCliMissing,

    #[error("Render engine `{engine}` is unavailable: {details}")]
    RenderEngineUnavailable { engine: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
