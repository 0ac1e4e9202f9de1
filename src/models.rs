//! Typed wire model of the public UPC API.
//!
//! Only the fields the pipelines consume are modeled; attributes the output
//! never carries (decision, spcs, registry number, year) are ignored by
//! serde rather than dropped in a later projection step.

use serde::Deserialize;

/// One entry from the opt-out list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptOutEntry {
    #[serde(default)]
    pub case_type: Option<String>,
    /// Formatted `%Y-%m-%d %H:%M:%S` by the API.
    #[serde(default)]
    pub date_of_lodging: Option<String>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
}

/// One page from the paginated cases endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasesPage {
    pub total_results: u64,
    #[serde(default)]
    pub content: Vec<CaseRecord>,
}

/// A single case record from the cases endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    #[serde(rename = "type", default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub full_number: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub receipt_date: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub division: Option<Division>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub judges: Vec<String>,
    #[serde(default)]
    pub patents: Vec<Patent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    #[serde(default)]
    pub court_type: Option<String>,
    #[serde(default)]
    pub division_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// Role tag: CLAIMANT, DEFENDANT or APPLICANT, case varies.
    #[serde(rename = "type", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patent {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Error envelope the API gateway wraps transient failures in.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultEnvelope {
    pub fault: Fault,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    #[serde(default)]
    pub faultstring: Option<String>,
    #[serde(default)]
    pub detail: Option<FaultDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaultDetail {
    #[serde(default)]
    pub errorcode: Option<String>,
}
