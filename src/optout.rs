//! Opt-out pipeline: per-patent fetch, historical and latest-only tables.

use crate::client::UpcClient;
use crate::error::Result;
use crate::models::OptOutEntry;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

const LODGING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptOutRow {
    pub patent_number: String,
    pub case_type: String,
    pub lodging_date: String,
    pub case_number: String,
    pub outcome: String,
}

impl OptOutRow {
    pub const COLUMNS: [&'static str; 5] = [
        "Patent Number",
        "Case Type",
        "Lodging Date",
        "Case Number",
        "Outcome",
    ];

    pub fn values(&self) -> [&str; 5] {
        [
            &self.patent_number,
            &self.case_type,
            &self.lodging_date,
            &self.case_number,
            &self.outcome,
        ]
    }

    /// Row for a patent with no opt-out entries: the key is kept, every
    /// other column stays blank.
    fn blank(patent_number: &str) -> Self {
        Self {
            patent_number: patent_number.to_string(),
            ..Self::default()
        }
    }

    fn from_entry(patent_number: &str, entry: &OptOutEntry) -> Self {
        Self {
            patent_number: patent_number.to_string(),
            case_type: entry.case_type.clone().unwrap_or_default(),
            lodging_date: entry.date_of_lodging.clone().unwrap_or_default(),
            case_number: entry.case_number.clone().unwrap_or_default(),
            outcome: entry.outcome.clone().unwrap_or_default(),
        }
    }
}

/// The two output views: one row per patent in `latest`, one row per
/// opt-out event in `historical`.
#[derive(Debug, Default)]
pub struct OptOutTables {
    pub latest: Vec<OptOutRow>,
    pub historical: Vec<OptOutRow>,
}

/// Fetches opt-out entries for every patent number and builds both tables.
pub async fn run(client: &UpcClient, patent_numbers: &[String]) -> Result<OptOutTables> {
    let mut tables = OptOutTables::default();
    for patent_number in patent_numbers {
        let entries = client.fetch_opt_outs(patent_number).await?;
        info!(patent_number = %patent_number, entries = entries.len(), "fetched opt-outs");
        append_patent(&mut tables, patent_number, &entries);
    }
    sort_tables(&mut tables);
    Ok(tables)
}

/// Adds one patent's entries: all of them to the historical table in API
/// order, and the most recently lodged one to the latest table. Equal
/// lodging dates keep the earlier entry (strictly-greater replacement).
pub fn append_patent(tables: &mut OptOutTables, patent_number: &str, entries: &[OptOutEntry]) {
    if entries.is_empty() {
        tables.historical.push(OptOutRow::blank(patent_number));
        tables.latest.push(OptOutRow::blank(patent_number));
        return;
    }

    let mut best: Option<(NaiveDateTime, OptOutRow)> = None;
    for entry in entries {
        let row = OptOutRow::from_entry(patent_number, entry);
        let lodged = parse_lodging_date(&row.lodging_date);
        match &best {
            Some((best_date, _)) if lodged <= *best_date => {}
            _ => best = Some((lodged, row.clone())),
        }
        tables.historical.push(row);
    }
    if let Some((_, row)) = best {
        tables.latest.push(row);
    }
}

/// Historical by (Patent Number, Lodging Date) ascending, latest by
/// Patent Number ascending.
pub fn sort_tables(tables: &mut OptOutTables) {
    tables.historical.sort_by(|a, b| {
        (a.patent_number.as_str(), a.lodging_date.as_str())
            .cmp(&(b.patent_number.as_str(), b.lodging_date.as_str()))
    });
    tables
        .latest
        .sort_by(|a, b| a.patent_number.cmp(&b.patent_number));
}

fn parse_lodging_date(raw: &str) -> NaiveDateTime {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, LODGING_DATE_FORMAT) {
        return parsed;
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
            return midnight;
        }
    }
    if !raw.is_empty() {
        warn!(raw, "unparseable lodging date, ordering it before all others");
    }
    NaiveDateTime::MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(lodged: &str, outcome: &str) -> OptOutEntry {
        OptOutEntry {
            case_type: Some("OPT_OUT".to_string()),
            date_of_lodging: Some(lodged.to_string()),
            case_number: Some(format!("CASE-{outcome}")),
            outcome: Some(outcome.to_string()),
        }
    }

    #[test]
    fn equal_lodging_dates_keep_first_entry() {
        let mut tables = OptOutTables::default();
        append_patent(
            &mut tables,
            "EP1111111",
            &[
                entry("2024-01-15 09:00:00", "first"),
                entry("2024-01-15 09:00:00", "second"),
            ],
        );
        assert_eq!(tables.latest.len(), 1);
        assert_eq!(tables.latest[0].outcome, "first");
        assert_eq!(tables.historical.len(), 2);
    }

    #[test]
    fn later_lodging_date_replaces_earlier() {
        let mut tables = OptOutTables::default();
        append_patent(
            &mut tables,
            "EP1111111",
            &[
                entry("2023-06-01 12:00:00", "old"),
                entry("2024-01-15 09:00:00", "new"),
                entry("2023-12-31 23:59:59", "middle"),
            ],
        );
        assert_eq!(tables.latest[0].outcome, "new");
    }

    #[test]
    fn latest_selection_is_idempotent() {
        let mut tables = OptOutTables::default();
        append_patent(
            &mut tables,
            "EP2222222",
            &[
                entry("2023-06-01 12:00:00", "old"),
                entry("2024-01-15 09:00:00", "new"),
            ],
        );
        sort_tables(&mut tables);

        // Re-run selection over the already-deduplicated latest table.
        let mut rerun = OptOutTables::default();
        for row in &tables.latest {
            let entries = [OptOutEntry {
                case_type: Some(row.case_type.clone()),
                date_of_lodging: Some(row.lodging_date.clone()),
                case_number: Some(row.case_number.clone()),
                outcome: Some(row.outcome.clone()),
            }];
            append_patent(&mut rerun, &row.patent_number, &entries);
        }
        sort_tables(&mut rerun);
        assert_eq!(rerun.latest, tables.latest);
    }

    #[test]
    fn tables_sort_by_patent_then_date() {
        let mut tables = OptOutTables::default();
        append_patent(&mut tables, "EP9999999", &[entry("2024-02-01 00:00:00", "late")]);
        append_patent(
            &mut tables,
            "EP1000000",
            &[
                entry("2024-03-01 00:00:00", "b"),
                entry("2024-01-01 00:00:00", "a"),
            ],
        );
        sort_tables(&mut tables);

        let order: Vec<(&str, &str)> = tables
            .historical
            .iter()
            .map(|r| (r.patent_number.as_str(), r.outcome.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("EP1000000", "a"),
                ("EP1000000", "b"),
                ("EP9999999", "late"),
            ]
        );
        assert_eq!(tables.latest[0].patent_number, "EP1000000");
        assert_eq!(tables.latest[1].patent_number, "EP9999999");
    }
}
