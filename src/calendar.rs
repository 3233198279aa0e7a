use crate::error::{ReportError, Result};
use crate::source::FilingRecord;
use chrono::{Datelike, NaiveDate};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parses the leading `YYYY-MM-DD` of a filing-date string.
///
/// Warehouse exports sometimes append a time component; only the date prefix
/// matters. Returns `None` on anything malformed so callers can skip the row.
pub fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// EDGAR electronic filing starts in 1994; anything outside a sane window is
/// a mistyped CLI argument.
pub fn validate_report_year(year: i32) -> Result<()> {
    if !(1994..=2100).contains(&year) {
        return Err(ReportError::InvalidReportYear(year));
    }
    Ok(())
}

/// Number of leading months of `report_year` treated as fully recorded.
///
/// The current calendar year is still accumulating, so only months strictly
/// before `today`'s month count. Any other year is bounded by the data
/// itself: the latest month holding a record is the last month that will
/// ever arrive, whether the year is historical backfill or a future test
/// fixture. `force_full_year` pins the answer to 12.
pub fn completed_month_count(
    records: &[FilingRecord],
    report_year: i32,
    today: NaiveDate,
    force_full_year: bool,
) -> u32 {
    if force_full_year {
        return 12;
    }

    if report_year == today.year() {
        return today.month() - 1;
    }

    records
        .iter()
        .filter(|record| record.filing_date.year() == report_year)
        .map(|record| record.filing_date.month())
        .max()
        .unwrap_or(0)
}
