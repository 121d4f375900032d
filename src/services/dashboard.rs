//! Dashboard overview aggregation.
//!
//! One concurrent fan-out per page load: contacts, campaigns, email stats
//! and both analytics summaries load in parallel and populate independent
//! slices, so a slow or broken vendor never blocks the rest of the page.

use serde::Serialize;

use crate::analytics::{google_fallback_summary, wix_fallback_summary};
use crate::error::ApiError;
use crate::fallback::{or_fallback, Sourced};
use crate::state::AppState;
use crate::types::{AnalyticsSummary, Campaign, EmailStats};

/// How many campaigns the overview lists.
const RECENT_CAMPAIGNS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// None when Copper is unconfigured or failed; the tile renders blank.
    pub contact_count: Option<usize>,
    pub recent_campaigns: Vec<Campaign>,
    pub email_stats: Sourced<EmailStats>,
    pub google_analytics: Sourced<AnalyticsSummary>,
    pub wix_analytics: Sourced<AnalyticsSummary>,
}

/// Load the overview. Never fails: degradable slices fall back, the rest
/// go empty with a warning.
pub async fn load_overview(state: &AppState) -> DashboardOverview {
    let (contacts, campaigns, email_stats, google, wix) = tokio::join!(
        fetch_contact_count(state),
        fetch_recent_campaigns(state),
        fetch_email_stats(state),
        fetch_google_summary(state),
        fetch_wix_summary(state),
    );

    DashboardOverview {
        contact_count: contacts,
        recent_campaigns: campaigns,
        email_stats,
        google_analytics: google,
        wix_analytics: wix,
    }
}

async fn fetch_contact_count(state: &AppState) -> Option<usize> {
    match state.copper() {
        Ok(client) => match client.list_contacts().await {
            Ok(contacts) => Some(contacts.len()),
            Err(e) => {
                log::warn!("dashboard: contact count unavailable: {}", e);
                None
            }
        },
        Err(_) => None,
    }
}

async fn fetch_recent_campaigns(state: &AppState) -> Vec<Campaign> {
    let result: Result<Vec<Campaign>, ApiError> = async {
        let mut campaigns = state.mailerlite()?.list_campaigns().await?;
        campaigns.truncate(RECENT_CAMPAIGNS);
        Ok(campaigns)
    }
    .await;

    match result {
        Ok(campaigns) => campaigns,
        Err(e) => {
            log::warn!("dashboard: campaigns unavailable: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_email_stats(state: &AppState) -> Sourced<EmailStats> {
    let result = match state.mailerlite() {
        Ok(client) => client.account_stats().await,
        Err(e) => Err(e),
    };
    or_fallback("MailerLite stats", result, crate::mailerlite::fallback_stats)
}

async fn fetch_google_summary(state: &AppState) -> Sourced<AnalyticsSummary> {
    let result = match state.google_analytics() {
        Ok(client) => client.traffic_summary().await,
        Err(e) => Err(e),
    };
    or_fallback("Google Analytics", result, google_fallback_summary)
}

async fn fetch_wix_summary(state: &AppState) -> Sourced<AnalyticsSummary> {
    let result = match state.wix() {
        Ok(client) => client.traffic_summary().await,
        Err(e) => Err(e),
    };
    or_fallback("Wix Analytics", result, wix_fallback_summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheDb;

    /// With no vendors configured every slice degrades and nothing errors —
    /// the fallback contract for the whole overview.
    #[tokio::test]
    async fn test_overview_with_no_vendors_serves_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDb::open(&dir.path().join("cache.db")).unwrap();
        let state = AppState::for_tests(cache);

        let overview = load_overview(&state).await;
        assert!(overview.contact_count.is_none());
        assert!(overview.recent_campaigns.is_empty());
        assert!(overview.email_stats.is_fallback());
        assert!(overview.google_analytics.is_fallback());
        assert!(overview.wix_analytics.is_fallback());
        // Fallback data is still a complete dataset.
        assert!(overview.google_analytics.data.page_views > 0);
    }
}
