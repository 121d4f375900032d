//! Shared DTOs for the dashboard API.
//!
//! These are the dashboard-facing shapes, not the raw vendor payloads. Each
//! vendor client deserializes the vendor's own JSON into its private raw
//! structs and maps into these at the boundary, so nothing downstream touches
//! untyped JSON.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A CRM contact as shown in the client list and the campaign wizard.
///
/// Sourced live from Copper; never locally authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Unix seconds, as Copper reports it.
    #[serde(default)]
    pub last_modified: Option<i64>,
}

/// Lifecycle status of a MailerLite campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Cancelled,
}

impl CampaignStatus {
    /// Map MailerLite's status string, defaulting unknown values to Draft.
    pub fn from_vendor(value: &str) -> Self {
        match value {
            "scheduled" | "ready" => CampaignStatus::Scheduled,
            "sending" => CampaignStatus::Sending,
            "sent" => CampaignStatus::Sent,
            "cancelled" | "stopped" => CampaignStatus::Cancelled,
            _ => CampaignStatus::Draft,
        }
    }
}

/// An email campaign summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub recipients_count: u64,
    #[serde(default)]
    pub opens_count: u64,
    #[serde(default)]
    pub clicks_count: u64,
}

/// A MailerLite subscriber group / segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active_count: u64,
    #[serde(default)]
    pub unsubscribed_count: u64,
}

/// A subscriber inside a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// An email template summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// A Copper custom field definition, filtered for date/anniversary fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub id: u64,
    pub name: String,
    pub data_type: String,
}

/// Assets-under-management record for one client.
///
/// The book itself is static seed data; overrides come from the local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AumRecord {
    pub client: String,
    pub aum: f64,
    /// Year-over-year growth, fractional (0.08 = 8%).
    pub growth: f64,
    /// Trailing performance, fractional.
    pub performance: f64,
}

/// One traffic source row in an analytics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSource {
    pub source: String,
    pub sessions: u64,
}

/// Website analytics summary (GA4 or Wix, same dashboard shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub page_views: u64,
    pub visitors: u64,
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub traffic_sources: Vec<TrafficSource>,
}

/// MailerLite account-level stats for the dashboard tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total_subscribers: u64,
    pub campaigns_sent: u64,
    pub average_open_rate: f64,
    pub average_click_rate: f64,
}

/// Per-client locally stored overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCustomFields {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub aum_override: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_status_from_vendor() {
        assert_eq!(CampaignStatus::from_vendor("sent"), CampaignStatus::Sent);
        assert_eq!(
            CampaignStatus::from_vendor("ready"),
            CampaignStatus::Scheduled
        );
        assert_eq!(
            CampaignStatus::from_vendor("stopped"),
            CampaignStatus::Cancelled
        );
        assert_eq!(
            CampaignStatus::from_vendor("something-new"),
            CampaignStatus::Draft
        );
    }

    #[test]
    fn test_contact_deserializes_with_missing_fields() {
        let json = r#"{"id": 7, "name": "Dana Whitfield"}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.id, 7);
        assert!(contact.tags.is_empty());
        assert!(contact.email.is_none());
    }
}
