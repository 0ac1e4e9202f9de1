//! HTTP access to the UPC API.
//!
//! The gateway in front of the API signals rate limiting and upstream
//! timeouts with a JSON fault envelope rather than plain status codes, so
//! every response body is checked against [`FaultEnvelope`] before the
//! payload itself is decoded. Transient faults retry with exponential
//! backoff up to a configured attempt cap; anything unrecognized is
//! surfaced to the caller instead of being retried forever.

use crate::config::{ApiConfig, RetryConfig};
use crate::error::{Result, ScraperError};
use crate::models::{CaseRecord, CasesPage, FaultEnvelope, OptOutEntry};
use chrono::{Duration as DateDuration, Local, NaiveDate};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const SPIKE_ARREST_CODE: &str = "policies.ratelimit.SpikeArrestViolation";
const GATEWAY_TIMEOUT_CODE: &str = "messaging.adaptors.http.flow.GatewayTimeout";

pub struct UpcClient {
    client: reqwest::Client,
    api: ApiConfig,
    retry: RetryConfig,
}

/// Outcome of a single request attempt.
enum Attempt<T> {
    Ok(T),
    Transient(String),
    Fatal(ScraperError),
}

impl UpcClient {
    pub fn new(api: ApiConfig, retry: RetryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api,
            retry,
        }
    }

    /// Start of the receipt-date query window: today minus the configured
    /// number of days.
    pub fn query_window_start(&self) -> NaiveDate {
        Local::now().date_naive() - DateDuration::days(self.api.window_days)
    }

    /// Fetches all opt-out entries lodged against one patent number.
    /// An empty list is a normal result, not an error.
    pub async fn fetch_opt_outs(&self, patent_number: &str) -> Result<Vec<OptOutEntry>> {
        let url = format!(
            "{}/opt-out/list?patentNumber={}",
            self.api.base_url,
            patent_number.trim()
        );
        self.get_with_retry(&url).await
    }

    /// Fetches every case received on or after `receipt_date_from`,
    /// walking the paginated endpoint sequentially.
    ///
    /// The first page doubles as the count probe: the API reports
    /// `totalResults` on every page, so page 1 is requested at full page
    /// size and its count determines how many further pages to pull.
    pub async fn fetch_cases_since(&self, receipt_date_from: NaiveDate) -> Result<Vec<CaseRecord>> {
        let first = self.fetch_cases_page(receipt_date_from, 1).await?;
        let pages = page_count(first.total_results, self.api.page_size);
        info!(
            total_results = first.total_results,
            pages, "case query window resolved"
        );

        let mut records = first.content;
        for page in 2..=pages {
            let next = self.fetch_cases_page(receipt_date_from, page).await?;
            debug!(page, records = next.content.len(), "fetched cases page");
            records.extend(next.content);
        }
        Ok(records)
    }

    async fn fetch_cases_page(&self, receipt_date_from: NaiveDate, page: u64) -> Result<CasesPage> {
        let url = format!(
            "{}/cases?receiptDateFrom={}&pageSize={}&pageNumber={}",
            self.api.base_url,
            receipt_date_from.format("%Y-%m-%d"),
            self.api.page_size,
            page
        );
        self.get_with_retry(&url).await
    }

    /// Issues a GET, retrying transient failures with exponential backoff.
    /// Retry state starts fresh for every call.
    async fn get_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut delay = Duration::from_millis(self.retry.initial_delay_ms);
        for attempt in 1..=self.retry.max_attempts {
            match self.try_get::<T>(url).await {
                Attempt::Ok(value) => return Ok(value),
                Attempt::Fatal(e) => return Err(e),
                Attempt::Transient(reason) => {
                    warn!(url, attempt, reason = %reason, "transient failure, backing off");
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(delay).await;
                        delay = next_delay(delay, Duration::from_millis(self.retry.max_delay_ms));
                    }
                }
            }
        }
        Err(ScraperError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.retry.max_attempts,
        })
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Attempt<T> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return Attempt::Transient(format!("transport error: {e}")),
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return Attempt::Transient(format!("body read error: {e}")),
        };

        // Fault envelopes can arrive with any status code.
        if let Ok(envelope) = serde_json::from_str::<FaultEnvelope>(&body) {
            return classify_fault(&envelope);
        }

        if !status.is_success() {
            return Attempt::Fatal(ScraperError::Api {
                message: format!("unexpected status {status} from {url}: {}", snippet(&body)),
            });
        }

        match serde_json::from_str::<T>(&body) {
            Ok(value) => Attempt::Ok(value),
            Err(e) => Attempt::Transient(format!("decode error: {e}")),
        }
    }
}

/// Number of pages needed to cover `total` results at `page_size` per page.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1)))
}

fn next_delay(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

fn classify_fault<T>(envelope: &FaultEnvelope) -> Attempt<T> {
    let code = envelope
        .fault
        .detail
        .as_ref()
        .and_then(|d| d.errorcode.as_deref())
        .unwrap_or("");
    match code {
        SPIKE_ARREST_CODE => Attempt::Transient("rate limited (spike arrest)".to_string()),
        GATEWAY_TIMEOUT_CODE => Attempt::Transient("gateway timeout".to_string()),
        _ => Attempt::Fatal(ScraperError::Api {
            message: format!(
                "API fault [{code}]: {}",
                envelope.fault.faultstring.as_deref().unwrap_or("(no faultstring)")
            ),
        }),
    }
}

fn snippet(body: &str) -> String {
    body.trim().chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(code: &str) -> FaultEnvelope {
        serde_json::from_value(serde_json::json!({
            "fault": {
                "faultstring": "whatever the gateway says",
                "detail": { "errorcode": code }
            }
        }))
        .unwrap()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(250, 100), 3);
        assert_eq!(page_count(100, 100), 1);
        assert_eq!(page_count(101, 100), 2);
        assert_eq!(page_count(0, 100), 0);
    }

    #[test]
    fn spike_arrest_and_gateway_timeout_are_transient() {
        for code in [SPIKE_ARREST_CODE, GATEWAY_TIMEOUT_CODE] {
            match classify_fault::<()>(&fault(code)) {
                Attempt::Transient(_) => {}
                _ => panic!("{code} should classify as transient"),
            }
        }
    }

    #[test]
    fn unknown_fault_code_is_fatal() {
        match classify_fault::<()>(&fault("steps.oauth.v2.InvalidApiKey")) {
            Attempt::Fatal(ScraperError::Api { message }) => {
                assert!(message.contains("InvalidApiKey"));
            }
            _ => panic!("unknown fault codes must not retry"),
        }
    }

    #[test]
    fn fault_without_detail_is_fatal() {
        let envelope: FaultEnvelope =
            serde_json::from_value(serde_json::json!({ "fault": { "faultstring": "oops" } }))
                .unwrap();
        match classify_fault::<()>(&envelope) {
            Attempt::Fatal(_) => {}
            _ => panic!("missing errorcode must not retry"),
        }
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let max = Duration::from_millis(30_000);
        let mut delay = Duration::from_millis(1000);
        let mut schedule = Vec::new();
        for _ in 0..7 {
            schedule.push(delay.as_millis());
            delay = next_delay(delay, max);
        }
        assert_eq!(schedule, vec![1000, 2000, 4000, 8000, 16000, 30000, 30000]);
    }
}
