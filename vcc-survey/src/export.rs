//! DFPI annual report export.
//!
//! One CSV row per company of the requested investment year. Only aggregate
//! counters and values derived from them appear; there is no individual-level
//! column.

use crate::error::{SurveyError, SurveyResult};
use vcc_types::{Aggregate, Category, Company};

const LEADING_COLUMNS: [&str; 5] = [
    "Company Name",
    "Investment Year",
    "Total Founders",
    "Total Responses",
    "Response Rate %",
];
const TRAILING_COLUMNS: [&str; 3] = ["Total Declined All", "Diverse Responders", "Primarily Diverse"];

/// Column headers, in row order. Category columns use their report labels
/// (e.g. "Gender: Woman").
pub fn report_header() -> Vec<String> {
    LEADING_COLUMNS
        .into_iter()
        .chain(Category::ALL.iter().map(|c| c.label()))
        .chain(TRAILING_COLUMNS)
        .map(String::from)
        .collect()
}

fn report_row(company: &Company, aggregate: &Aggregate) -> Vec<String> {
    let mut row = vec![
        company.name.clone(),
        company.investment_year.to_string(),
        company.founder_count.to_string(),
        aggregate.total_responses.to_string(),
        format!("{:.1}", aggregate.response_rate(company.founder_count) * 100.0),
    ];
    row.extend(Category::ALL.iter().map(|c| aggregate.count(*c).to_string()));
    row.push(aggregate.total_declined_all.to_string());
    row.push(aggregate.diverse_responders.to_string());
    row.push(if aggregate.is_primarily_diverse { "Yes" } else { "No" }.to_string());
    row
}

/// Renders the report for already-ordered `(company, aggregate)` pairs.
pub fn render_report(rows: &[(Company, Aggregate)]) -> SurveyResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(report_header())
        .map_err(|e| SurveyError::Export(format!("CSV header error: {e}")))?;

    for (company, aggregate) in rows {
        wtr.write_record(report_row(company, aggregate))
            .map_err(|e| SurveyError::Export(format!("CSV row error: {e}")))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SurveyError::Export(format!("CSV flush error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| SurveyError::Export(format!("CSV encoding error: {e}")))
}
