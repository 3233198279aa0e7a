use crate::aggregate::ReportTable;

pub const SYSTEM_PROMPT: &str = "You are the Chief Strategy Officer at EDGAR Agents. Provide \
    executive-level strategic analysis focused on filing-agent competition, form-type trends, \
    market share opportunities, and growth recommendations. Avoid legal advice.";

/// Serializes the full grid (agent rows plus the Total row) as a Markdown
/// table for the completion prompt.
pub fn table_to_markdown(table: &ReportTable) -> String {
    let headers = ReportTable::headers();
    let mut lines = Vec::with_capacity(table.agents.len() + 3);
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; headers.len()].join("|")));
    for row in table.to_rows() {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.join("\n")
}

pub fn build_user_prompt(table: &ReportTable, completed_months: u32, prior_context: &str) -> String {
    format!(
        "Analyze this S-1/F-1 filing table for {year}. \
         The table displays all 12 months, but you must only analyze completed months through \
         month {completed_months}. \
         Do not comment on future months that have not happened yet. \
         Use this prior-year continuity context for trend comparison: {prior_context}\n\n\
         Provide Market Insight Summary, Competitor trends, 90-day action plan, and long-term \
         growth blueprint.\n\n\
         {table_markdown}",
        year = table.year,
        table_markdown = table_to_markdown(table),
    )
}
