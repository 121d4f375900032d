//! Wix site analytics client.
//!
//! Auth is an API key header plus the site id. Wix returns one measurement
//! series per requested type; the dashboard only needs the totals.

use serde::Deserialize;

use crate::config::WixCredentials;
use crate::error::ApiError;
use crate::http::{check_status, send_with_retry, RetryPolicy};
use crate::types::AnalyticsSummary;

const WIX_API_BASE: &str = "https://www.wixapis.com/analytics/v2";
const VENDOR: &str = "Wix";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeasurementsResponse {
    #[serde(default)]
    data: Vec<Measurement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Measurement {
    #[serde(rename = "type", default)]
    measurement_type: String,
    #[serde(default)]
    values: Vec<MeasurementValue>,
}

#[derive(Debug, Deserialize)]
struct MeasurementValue {
    #[serde(default)]
    value: f64,
}

pub struct WixClient {
    client: reqwest::Client,
    credentials: WixCredentials,
    retry: RetryPolicy,
}

impl WixClient {
    pub fn new(client: reqwest::Client, credentials: WixCredentials) -> Self {
        Self {
            client,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    /// Session/visitor/pageview totals for the trailing 30 days.
    pub async fn traffic_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let today = chrono::Utc::now().date_naive();
        let start = (today - chrono::Duration::days(30)).to_string();
        let end = today.to_string();

        let request = self
            .client
            .get(format!("{}/site-analytics/data", WIX_API_BASE))
            .header("Authorization", &self.credentials.api_key)
            .header("wix-site-id", &self.credentials.site_id)
            .query(&[
                ("measurementTypes", "TOTAL_SESSIONS"),
                ("measurementTypes", "TOTAL_UNIQUE_VISITORS"),
                ("measurementTypes", "TOTAL_PAGE_VIEWS"),
                ("dateRange.startDate", start.as_str()),
                ("dateRange.endDate", end.as_str()),
            ]);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let measurements: MeasurementsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;

        Ok(summarize(measurements))
    }
}

fn summarize(measurements: MeasurementsResponse) -> AnalyticsSummary {
    let total = |wanted: &str| -> u64 {
        measurements
            .data
            .iter()
            .filter(|m| m.measurement_type == wanted)
            .flat_map(|m| m.values.iter())
            .map(|v| v.value)
            .sum::<f64>() as u64
    };

    AnalyticsSummary {
        page_views: total("TOTAL_PAGE_VIEWS"),
        visitors: total("TOTAL_UNIQUE_VISITORS"),
        sessions: total("TOTAL_SESSIONS"),
        // Wix doesn't break sessions down by channel on this endpoint.
        traffic_sources: Vec::new(),
    }
}
