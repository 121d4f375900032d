//! GA4 Data API client.
//!
//! Access tokens come from the OAuth2 refresh-token flow; the refreshed
//! token is cached in memory and refreshes are serialized behind a tokio
//! Mutex so concurrent dashboard loads don't stampede the token endpoint.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::GoogleAnalyticsCredentials;
use crate::error::ApiError;
use crate::http::{check_status, send_with_retry, RetryPolicy};
use crate::types::{AnalyticsSummary, TrafficSource};

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";
const VENDOR: &str = "Google Analytics";

/// Refresh slightly early so an in-flight request never carries a token that
/// expires mid-call.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

// GA4 runReport response, reduced to the fields the dashboard reads.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<ReportRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow {
    #[serde(default)]
    dimension_values: Vec<ReportValue>,
    #[serde(default)]
    metric_values: Vec<ReportValue>,
}

#[derive(Debug, Deserialize)]
struct ReportValue {
    #[serde(default)]
    value: String,
}

pub struct GoogleAnalyticsClient {
    client: reqwest::Client,
    credentials: GoogleAnalyticsCredentials,
    retry: RetryPolicy,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleAnalyticsClient {
    pub fn new(client: reqwest::Client, credentials: GoogleAnalyticsCredentials) -> Self {
        Self {
            client,
            credentials,
            retry: RetryPolicy::default(),
            token: Mutex::new(None),
        }
    }

    /// Get a valid access token, refreshing through the OAuth2 token
    /// endpoint when the cached one is missing or near expiry.
    async fn access_token(&self) -> Result<String, ApiError> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref() {
            let margin = ChronoDuration::seconds(EXPIRY_MARGIN_SECS);
            if cached.expires_at > Utc::now() + margin {
                return Ok(cached.access_token.clone());
            }
        }

        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let request = self.client.post(TOKEN_URI).form(&form);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;

        let cached = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Utc::now() + ChronoDuration::seconds(token.expires_in),
        };
        *guard = Some(cached);
        Ok(token.access_token)
    }

    /// Pageviews, visitors and traffic-source breakdown for the trailing
    /// 30 days, from a single runReport keyed by default channel group.
    pub async fn traffic_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let token = self.access_token().await?;

        let body = serde_json::json!({
            "dateRanges": [{"startDate": "30daysAgo", "endDate": "today"}],
            "dimensions": [{"name": "sessionDefaultChannelGroup"}],
            "metrics": [
                {"name": "screenPageViews"},
                {"name": "activeUsers"},
                {"name": "sessions"}
            ],
            "orderBys": [{"desc": true, "metric": {"metricName": "sessions"}}]
        });

        let url = format!(
            "{}/properties/{}:runReport",
            DATA_API_BASE, self.credentials.property_id
        );
        let request = self.client.post(url).bearer_auth(token).json(&body);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let report: RunReportResponse = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;

        Ok(summarize(report))
    }
}

fn summarize(report: RunReportResponse) -> AnalyticsSummary {
    let mut summary = AnalyticsSummary {
        page_views: 0,
        visitors: 0,
        sessions: 0,
        traffic_sources: Vec::new(),
    };

    for row in report.rows {
        let metric = |idx: usize| -> u64 {
            row.metric_values
                .get(idx)
                .and_then(|v| v.value.parse::<u64>().ok())
                .unwrap_or(0)
        };
        let channel = row
            .dimension_values
            .first()
            .map(|v| v.value.clone())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "(other)".to_string());

        summary.page_views += metric(0);
        summary.visitors += metric(1);
        let sessions = metric(2);
        summary.sessions += sessions;
        summary.traffic_sources.push(TrafficSource {
            source: channel,
            sessions,
        });
    }

    summary
}
