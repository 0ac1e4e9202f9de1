//! Proceedings pipeline: windowed paged fetch, flatten, date cleanup.

use crate::client::UpcClient;
use crate::error::Result;
use crate::flatten::{flatten, ProceedingRow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::info;

/// Fetches every case in the configured receipt-date window and flattens
/// the lot into output rows.
pub async fn run(client: &UpcClient) -> Result<Vec<ProceedingRow>> {
    let since = client.query_window_start();
    info!(%since, "fetching proceedings window");

    let records = client.fetch_cases_since(since).await?;
    let mut rows: Vec<ProceedingRow> = records.iter().flat_map(flatten).collect();
    info!(cases = records.len(), rows = rows.len(), "flattened proceedings");

    for row in &mut rows {
        row.filing_date = date_only(&row.filing_date);
        row.receipt_date = date_only(&row.receipt_date);
    }
    Ok(rows)
}

/// Truncates a date-time string to its calendar date. Bare dates and
/// unrecognized values pass through unchanged.
pub fn date_only(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.date_naive().format("%Y-%m-%d").to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return parsed.date().format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only_truncates_time_component() {
        assert_eq!(date_only("2024-01-15T10:30:00"), "2024-01-15");
        assert_eq!(date_only("2024-01-15T10:30:00.123"), "2024-01-15");
        assert_eq!(date_only("2024-01-15 10:30:00"), "2024-01-15");
        assert_eq!(date_only("2024-01-15T10:30:00+02:00"), "2024-01-15");
    }

    #[test]
    fn date_only_passes_bare_dates_and_junk_through() {
        assert_eq!(date_only("2024-01-15"), "2024-01-15");
        assert_eq!(date_only(""), "");
        assert_eq!(date_only("not a date"), "not a date");
    }
}
