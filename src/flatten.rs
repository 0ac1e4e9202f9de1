//! Flattening of nested case records into output rows.
//!
//! A case references 0..N patents; one output row is produced per patent,
//! with the case-level fields duplicated across the expansion. A case with
//! no patents still yields exactly one row with the patent fields blank.

use crate::models::{CaseRecord, Party};

const NAME_PLACEHOLDER: &str = "[Name not provided]";
const COMPANY_PLACEHOLDER: &str = "[Company not provided]";

/// One published output row, in the final column set. IPC Classification
/// and Value are carried in the published schema but never populated by
/// the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProceedingRow {
    pub case_type: String,
    pub action_number: String,
    pub parties: String,
    pub patent_number: String,
    pub title: String,
    pub language: String,
    pub filing_date: String,
    pub receipt_date: String,
    pub court: String,
    pub representatives: String,
    pub judges: String,
    pub ipc_classification: String,
    pub value: String,
}

impl ProceedingRow {
    pub const COLUMNS: [&'static str; 13] = [
        "Type",
        "Action Number",
        "Parties",
        "Patent Number",
        "Title",
        "Language",
        "Filing Date",
        "Receipt Date",
        "Court",
        "Representatives",
        "Judges",
        "IPC Classification",
        "Value",
    ];

    /// Cell values in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [&str; 13] {
        [
            &self.case_type,
            &self.action_number,
            &self.parties,
            &self.patent_number,
            &self.title,
            &self.language,
            &self.filing_date,
            &self.receipt_date,
            &self.court,
            &self.representatives,
            &self.judges,
            &self.ipc_classification,
            &self.value,
        ]
    }
}

/// Expands one case record into its flat rows.
pub fn flatten(record: &CaseRecord) -> Vec<ProceedingRow> {
    let (representatives, parties) = party_blocks(&record.parties);
    let base = ProceedingRow {
        case_type: text(&record.case_type),
        action_number: text(&record.full_number),
        parties,
        patent_number: String::new(),
        title: String::new(),
        language: text(&record.language),
        filing_date: text(&record.creation_date),
        receipt_date: text(&record.receipt_date),
        court: court_label(record),
        representatives,
        judges: record.judges.join("\n"),
        ipc_classification: String::new(),
        value: String::new(),
    };

    if record.patents.is_empty() {
        return vec![base];
    }
    record
        .patents
        .iter()
        .map(|patent| {
            let mut row = base.clone();
            row.patent_number = text(&patent.number);
            row.title = text(&patent.description);
            row
        })
        .collect()
}

/// Court column: court type over division type, blank when the record has
/// no division.
fn court_label(record: &CaseRecord) -> String {
    match &record.division {
        Some(division) => format!(
            "{}\n{}",
            division.court_type.as_deref().unwrap_or(""),
            division.division_type.as_deref().unwrap_or("")
        ),
        None => String::new(),
    }
}

/// Builds the Representatives and Parties columns from the party list.
///
/// Representatives: parties partitioned by role tag (case-insensitive)
/// into numbered "name (company)" blocks titled Claimants/Defendants/
/// Applicants, joined by blank lines, empty roles omitted.
///
/// Parties: numbered claimant companies versus numbered defendant
/// companies, populated only when both sides are present.
fn party_blocks(parties: &[Party]) -> (String, String) {
    let mut claimant_reps = Vec::new();
    let mut defendant_reps = Vec::new();
    let mut applicant_reps = Vec::new();
    let mut claimant_companies = Vec::new();
    let mut defendant_companies = Vec::new();

    for party in parties {
        let company = party
            .company_name
            .clone()
            .unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string());
        let name = match (&party.name, &party.surname) {
            (Some(name), Some(surname)) => format!("{name} {surname}"),
            _ => NAME_PLACEHOLDER.to_string(),
        };

        match party.role.as_deref().map(str::to_uppercase).as_deref() {
            Some("CLAIMANT") => {
                claimant_reps.push(format!("{name} ({company})"));
                claimant_companies.push(company);
            }
            Some("DEFENDANT") => {
                defendant_reps.push(format!("{name} ({company})"));
                defendant_companies.push(company);
            }
            Some("APPLICANT") => {
                applicant_reps.push(format!("{name} ({company})"));
            }
            _ => {}
        }
    }

    let mut blocks = Vec::new();
    for (title, members) in [
        ("Claimants:", &claimant_reps),
        ("Defendants:", &defendant_reps),
        ("Applicants:", &applicant_reps),
    ] {
        if !members.is_empty() {
            blocks.push(format!("{title}\n{}", numbered(members)));
        }
    }
    let representatives = blocks.join("\n\n");

    let parties_summary = if !claimant_companies.is_empty() && !defendant_companies.is_empty() {
        format!(
            "{}\n\nV\n\n{}",
            numbered(&claimant_companies),
            numbered(&defendant_companies)
        )
    } else {
        String::new()
    };

    (representatives, parties_summary)
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}
