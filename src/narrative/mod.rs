//! Executive-summary generation.
//!
//! Two strategies with a fixed fallback order: a remote chat-completion call
//! when a credential is configured, and a deterministic local summarizer that
//! is always available. Remote failures of any kind fall back to the local
//! strategy; narrative generation never aborts a report run.

pub mod client;
pub mod local;
pub mod prompts;

pub use client::{CompletionClient, NarrativeError};

use crate::aggregate::ReportTable;
use crate::config::NarrativeConfig;
use log::{debug, warn};

/// Produces the narrative text for the report.
///
/// Only completed months are summarized; the prior-year context string gives
/// the model (or the local template) continuity with the preceding year.
pub fn generate(
    table: &ReportTable,
    completed_months: u32,
    prior_context: &str,
    config: &NarrativeConfig,
) -> String {
    let Some(api_key) = config.api_key.as_deref() else {
        debug!("no narrative credential configured; using local summarizer");
        return local::summarize(table, completed_months, prior_context);
    };

    let client = CompletionClient::new(api_key.to_string(), config.endpoint.clone());
    let user_prompt = prompts::build_user_prompt(table, completed_months, prior_context);
    match client.complete(&config.model, prompts::SYSTEM_PROMPT, &user_prompt) {
        Ok(text) => text,
        Err(err) => {
            warn!("narrative service failed, falling back to local summary: {err}");
            local::summarize(table, completed_months, prior_context)
        }
    }
}

/// One-line continuity summary of the prior year, restricted to the same
/// completed-month span as the report year so the comparison is like-for-like.
pub fn prior_year_context(prior_table: &ReportTable, completed_months: u32) -> String {
    let comparable = completed_months.min(12) as usize;
    let comparable_total: u64 = prior_table.month_totals[..comparable].iter().sum();
    let month_pairs: Vec<String> = (0..12)
        .map(|index| {
            let count = if index < comparable {
                prior_table.month_totals[index]
            } else {
                0
            };
            format!("{}:{}", index + 1, count)
        })
        .collect();

    format!(
        "Prior-year trend context for {} (S-1/F-1, comparable months only through month {}): \
         total={}; monthly={}",
        prior_table.year,
        comparable,
        comparable_total,
        month_pairs.join(", ")
    )
}
