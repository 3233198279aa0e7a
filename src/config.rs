use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4.1";

/// Connection parameters for the warehouse fact table of enriched filings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub project: String,
    pub dataset: String,
    pub table: String,
    pub location: String,
    pub report_year: i32,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project: "sec-edgar-ralph".to_string(),
            dataset: "edgar".to_string(),
            table: "fact_filing_enriched".to_string(),
            location: "US".to_string(),
            report_year: 2026,
        }
    }
}

/// Credential and model selection for the executive-summary service.
///
/// Captured from the environment exactly once at startup; the rest of the
/// crate only ever sees this struct. `api_key: None` selects the local
/// deterministic summarizer.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl NarrativeConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("OPENAI_MODEL")
                .ok()
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
        }
    }

    /// Configuration that never calls out, regardless of environment.
    pub fn local_only() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
        }
    }
}
