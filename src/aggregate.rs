use crate::calendar::MONTH_LABELS;
use crate::classify::FormBucket;
use crate::source::FilingRecord;
use chrono::Datelike;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// One filing agent's dense 12-month count vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRow {
    pub agent: String,
    pub monthly: [u64; 12],
    pub total: u64,
}

/// Dense agent-by-month count matrix for one report year, with totals.
///
/// Every agent with at least one counted filing appears exactly once, rows
/// sorted by descending total then agent name. Months without activity stay
/// zero so the rendered grid always spans Jan-Dec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub year: i32,
    pub agents: Vec<AgentRow>,
    pub month_totals: [u64; 12],
    pub grand_total: u64,
}

/// Buckets S-1/F-1 filings for `report_year` into the agent-by-month matrix.
///
/// Filings are counted by distinct accession number per (agent, month), so
/// amendment rows sharing an accession never double-count.
pub fn build_report_table(records: &[FilingRecord], report_year: i32) -> ReportTable {
    let mut accessions: BTreeMap<(&str, u32), BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        if !FormBucket::classify(&record.form_type).is_registration() {
            continue;
        }
        if record.filing_date.year() != report_year {
            continue;
        }
        accessions
            .entry((record.agent.as_str(), record.filing_date.month()))
            .or_default()
            .insert(record.accession_number.as_str());
    }

    let mut per_agent: BTreeMap<&str, [u64; 12]> = BTreeMap::new();
    for (&(agent, month), numbers) in &accessions {
        per_agent.entry(agent).or_insert([0; 12])[(month - 1) as usize] = numbers.len() as u64;
    }

    let mut agents: Vec<AgentRow> = per_agent
        .into_iter()
        .map(|(agent, monthly)| AgentRow {
            agent: agent.to_string(),
            monthly,
            total: monthly.iter().sum(),
        })
        .collect();
    agents.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.agent.cmp(&b.agent)));

    let mut month_totals = [0u64; 12];
    for row in &agents {
        for (slot, count) in month_totals.iter_mut().zip(row.monthly) {
            *slot += count;
        }
    }
    let grand_total = month_totals.iter().sum();

    debug!(
        "aggregated {} agents, {} distinct filings for {}",
        agents.len(),
        grand_total,
        report_year
    );

    ReportTable {
        year: report_year,
        agents,
        month_totals,
        grand_total,
    }
}

impl ReportTable {
    pub fn headers() -> Vec<String> {
        let mut headers = Vec::with_capacity(14);
        headers.push("Filing Agent".to_string());
        headers.extend(MONTH_LABELS.iter().map(|label| label.to_string()));
        headers.push("Total".to_string());
        headers
    }

    /// Rendered grid rows: one per agent plus the synthetic `Total` row.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = self
            .agents
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(14);
                cells.push(row.agent.clone());
                cells.extend(row.monthly.iter().map(u64::to_string));
                cells.push(row.total.to_string());
                cells
            })
            .collect();

        let mut total_row = Vec::with_capacity(14);
        total_row.push("Total".to_string());
        total_row.extend(self.month_totals.iter().map(u64::to_string));
        total_row.push(self.grand_total.to_string());
        rows.push(total_row);
        rows
    }

    /// Leading `count` months of the column totals.
    pub fn completed_month_totals(&self, count: u32) -> &[u64] {
        &self.month_totals[..count.min(12) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_filing_date;

    fn record(agent: &str, date: &str, form: &str, accession: &str) -> FilingRecord {
        FilingRecord {
            agent: agent.to_string(),
            filing_date: parse_filing_date(date).unwrap(),
            form_type: form.to_string(),
            accession_number: accession.to_string(),
        }
    }

    fn sample_records() -> Vec<FilingRecord> {
        vec![
            record("Donnelley", "2026-01-05", "S-1", "0001-26-000001"),
            record("Donnelley", "2026-01-19", "F-1", "0001-26-000002"),
            record("Donnelley", "2026-03-02", "S-1", "0001-26-000003"),
            record("Broadridge", "2026-03-12", "S-1", "0002-26-000001"),
            record("Toppan", "2026-06-30", "F-1", "0003-26-000001"),
            // Amendment sharing an accession with the March Donnelley filing.
            record("Donnelley", "2026-03-02", "S-1/A", "0001-26-000003"),
            // Outside the report scope: wrong form, wrong year.
            record("Donnelley", "2026-02-14", "10-K", "0001-26-000099"),
            record("Donnelley", "2025-12-31", "S-1", "0001-25-000050"),
        ]
    }

    #[test]
    fn test_matrix_shape_and_cell_sum() {
        let table = build_report_table(&sample_records(), 2026);
        assert_eq!(table.agents.len(), 3);
        for row in &table.agents {
            assert_eq!(row.monthly.len(), 12);
            assert_eq!(row.total, row.monthly.iter().sum::<u64>());
        }
        // 5 distinct S-1/F-1 accessions in 2026.
        assert_eq!(table.grand_total, 5);
        let cell_sum: u64 = table.agents.iter().flat_map(|r| r.monthly).sum();
        assert_eq!(cell_sum, 5);
    }

    #[test]
    fn test_totals_are_consistent() {
        let table = build_report_table(&sample_records(), 2026);
        let row_total_sum: u64 = table.agents.iter().map(|r| r.total).sum();
        let col_total_sum: u64 = table.month_totals.iter().sum();
        assert_eq!(table.grand_total, row_total_sum);
        assert_eq!(table.grand_total, col_total_sum);
    }

    #[test]
    fn test_amendments_dedupe_by_accession() {
        let table = build_report_table(&sample_records(), 2026);
        let donnelley = table
            .agents
            .iter()
            .find(|row| row.agent == "Donnelley")
            .unwrap();
        // Jan has two filings, Mar has one (the /A shares its accession).
        assert_eq!(donnelley.monthly[0], 2);
        assert_eq!(donnelley.monthly[2], 1);
        assert_eq!(donnelley.total, 3);
    }

    #[test]
    fn test_row_order_descending_total_then_name() {
        let mut records = sample_records();
        records.push(record("Adams & Co", "2026-06-01", "S-1", "0004-26-000001"));
        let table = build_report_table(&records, 2026);
        let order: Vec<&str> = table.agents.iter().map(|r| r.agent.as_str()).collect();
        // Broadridge, Toppan and Adams & Co all hold one filing; ties break
        // alphabetically after Donnelley's three.
        assert_eq!(order, vec!["Donnelley", "Adams & Co", "Broadridge", "Toppan"]);
    }

    #[test]
    fn test_empty_year_keeps_full_grid() {
        let table = build_report_table(&sample_records(), 2020);
        assert!(table.agents.is_empty());
        assert_eq!(table.month_totals, [0; 12]);
        assert_eq!(table.grand_total, 0);

        let rows = table.to_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 14);
        assert_eq!(rows[0][0], "Total");
        assert!(rows[0][1..].iter().all(|cell| cell == "0"));
    }

    #[test]
    fn test_rendered_rows_include_total_row() {
        let table = build_report_table(&sample_records(), 2026);
        let headers = ReportTable::headers();
        assert_eq!(headers.len(), 14);
        assert_eq!(headers[0], "Filing Agent");
        assert_eq!(headers[13], "Total");

        let rows = table.to_rows();
        assert_eq!(rows.len(), table.agents.len() + 1);
        let total_row = rows.last().unwrap();
        assert_eq!(total_row[0], "Total");
        assert_eq!(total_row[13], table.grand_total.to_string());
    }
}
