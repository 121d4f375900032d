//! REST client for the MailerLite Connect API.
//!
//! Bearer token auth. List endpoints wrap their payload in `{ "data": ... }`;
//! raw shapes are kept private and mapped into `types` DTOs at the boundary.

use serde::{Deserialize, Serialize};

use crate::config::MailerLiteCredentials;
use crate::error::ApiError;
use crate::http::{check_status, send_with_retry, RetryPolicy};
use crate::types::{Campaign, CampaignStatus, EmailStats, EmailTemplate, Group, Subscriber};

const MAILERLITE_API_BASE: &str = "https://connect.mailerlite.com/api";
const VENDOR: &str = "MailerLite";

// ---------------------------------------------------------------------------
// Raw response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawCampaign {
    id: String,
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    emails: Vec<RawCampaignEmail>,
    #[serde(default)]
    stats: Option<RawCampaignStats>,
}

#[derive(Debug, Deserialize)]
struct RawCampaignEmail {
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCampaignStats {
    #[serde(default)]
    sent: u64,
    #[serde(default)]
    opens_count: u64,
    #[serde(default)]
    clicks_count: u64,
    #[serde(default)]
    open_rate: RawRate,
    #[serde(default)]
    click_rate: RawRate,
}

#[derive(Debug, Default, Deserialize)]
struct RawRate {
    #[serde(default)]
    float: f64,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    name: String,
    #[serde(default)]
    active_count: u64,
    #[serde(default)]
    unsubscribed_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawSubscriber {
    id: String,
    email: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    fields: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    id: String,
    name: String,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl From<RawCampaign> for Campaign {
    fn from(raw: RawCampaign) -> Self {
        let stats = raw.stats.unwrap_or_default();
        Campaign {
            id: raw.id,
            name: raw.name,
            subject: raw.emails.into_iter().next().and_then(|e| e.subject),
            status: CampaignStatus::from_vendor(&raw.status),
            recipients_count: stats.sent,
            opens_count: stats.opens_count,
            clicks_count: stats.clicks_count,
        }
    }
}

impl From<RawSubscriber> for Subscriber {
    fn from(raw: RawSubscriber) -> Self {
        let name = raw
            .fields
            .as_ref()
            .and_then(|f| f.get("name"))
            .and_then(|n| n.as_str())
            .map(|n| n.to_string());
        Subscriber {
            id: raw.id,
            email: raw.email,
            name,
            status: raw.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Parameters for creating a regular campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    pub subject: String,
    pub from_name: String,
    pub from_email: String,
    pub html_content: String,
    /// Target group ids; empty means the whole list.
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// Upsert a subscriber, optionally assigning groups.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberUpsert {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// One-shot campaign: create a draft and schedule it immediately.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSendRequest {
    #[serde(flatten)]
    pub draft: CampaignDraft,
}

#[derive(Debug, Serialize)]
struct CreateCampaignBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    campaign_type: &'static str,
    emails: Vec<CreateCampaignEmail<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateCampaignEmail<'a> {
    subject: &'a str,
    from_name: &'a str,
    from: &'a str,
    content: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct MailerLiteClient {
    client: reqwest::Client,
    credentials: MailerLiteCredentials,
    retry: RetryPolicy,
}

impl MailerLiteClient {
    pub fn new(client: reqwest::Client, credentials: MailerLiteCredentials) -> Self {
        Self {
            client,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", MAILERLITE_API_BASE, path))
            .bearer_auth(&self.credentials.api_key)
            .header("Accept", "application/json")
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(reqwest::Method::GET, path);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let envelope: DataEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;
        Ok(envelope.data)
    }

    /// List campaigns, newest first as MailerLite returns them.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        let raw: Vec<RawCampaign> = self.get_data("/campaigns").await?;
        Ok(raw.into_iter().map(Campaign::from).collect())
    }

    /// Create a regular campaign draft.
    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, ApiError> {
        let body = CreateCampaignBody {
            name: &draft.name,
            campaign_type: "regular",
            emails: vec![CreateCampaignEmail {
                subject: &draft.subject,
                from_name: &draft.from_name,
                from: &draft.from_email,
                content: &draft.html_content,
            }],
            groups: draft.group_ids.iter().map(String::as_str).collect(),
        };
        let request = self
            .request(reqwest::Method::POST, "/campaigns")
            .json(&body);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let envelope: DataEnvelope<RawCampaign> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;
        Ok(Campaign::from(envelope.data))
    }

    /// Schedule a draft campaign for immediate delivery.
    pub async fn send_campaign(&self, campaign_id: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "delivery": "instant" });
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("/campaigns/{}/schedule", campaign_id),
            )
            .json(&body);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        check_status(VENDOR, response).await?;
        Ok(())
    }

    /// Create a draft and schedule it in one round trip pair.
    pub async fn quick_send(&self, req: &QuickSendRequest) -> Result<Campaign, ApiError> {
        let campaign = self.create_campaign(&req.draft).await?;
        self.send_campaign(&campaign.id).await?;
        log::info!("MailerLite: quick-send dispatched campaign {}", campaign.id);
        Ok(campaign)
    }

    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>, ApiError> {
        let raw: Vec<RawTemplate> = self.get_data("/templates").await?;
        Ok(raw
            .into_iter()
            .map(|t| EmailTemplate {
                id: t.id,
                name: t.name,
                thumbnail_url: t.thumbnail,
            })
            .collect())
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let raw: Vec<RawGroup> = self.get_data("/groups").await?;
        Ok(raw.into_iter().map(group_from_raw).collect())
    }

    pub async fn create_group(&self, name: &str) -> Result<Group, ApiError> {
        let body = serde_json::json!({ "name": name });
        let request = self.request(reqwest::Method::POST, "/groups").json(&body);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let envelope: DataEnvelope<RawGroup> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;
        Ok(group_from_raw(envelope.data))
    }

    pub async fn group_subscribers(&self, group_id: &str) -> Result<Vec<Subscriber>, ApiError> {
        let raw: Vec<RawSubscriber> = self
            .get_data(&format!("/groups/{}/subscribers", group_id))
            .await?;
        Ok(raw.into_iter().map(Subscriber::from).collect())
    }

    /// Upsert a subscriber and attach the requested groups.
    pub async fn upsert_subscriber(&self, req: &SubscriberUpsert) -> Result<Subscriber, ApiError> {
        let mut body = serde_json::json!({ "email": req.email });
        if let Some(name) = &req.name {
            body["fields"] = serde_json::json!({ "name": name });
        }
        if !req.group_ids.is_empty() {
            body["groups"] = serde_json::json!(req.group_ids);
        }
        let request = self
            .request(reqwest::Method::POST, "/subscribers")
            .json(&body);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;
        let envelope: DataEnvelope<RawSubscriber> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;
        Ok(Subscriber::from(envelope.data))
    }

    /// Account-level email stats, aggregated from sent campaigns.
    pub async fn account_stats(&self) -> Result<EmailStats, ApiError> {
        let raw: Vec<RawCampaign> = self.get_data("/campaigns").await?;
        Ok(aggregate_stats(&raw))
    }
}

fn group_from_raw(raw: RawGroup) -> Group {
    Group {
        id: raw.id,
        name: raw.name,
        active_count: raw.active_count,
        unsubscribed_count: raw.unsubscribed_count,
    }
}

fn aggregate_stats(campaigns: &[RawCampaign]) -> EmailStats {
    let sent: Vec<&RawCampaign> = campaigns
        .iter()
        .filter(|c| CampaignStatus::from_vendor(&c.status) == CampaignStatus::Sent)
        .collect();

    let campaigns_sent = sent.len() as u64;
    let total_subscribers = sent.iter().map(|c| stats_of(c).sent).max().unwrap_or(0);

    let (open_sum, click_sum) = sent.iter().fold((0.0, 0.0), |(o, c), campaign| {
        let stats = stats_of(campaign);
        (o + stats.open_rate.float, c + stats.click_rate.float)
    });
    let denom = campaigns_sent.max(1) as f64;

    EmailStats {
        total_subscribers,
        campaigns_sent,
        average_open_rate: open_sum / denom,
        average_click_rate: click_sum / denom,
    }
}

fn stats_of(campaign: &RawCampaign) -> RawCampaignStats {
    RawCampaignStats {
        sent: campaign.stats.as_ref().map(|s| s.sent).unwrap_or(0),
        opens_count: campaign.stats.as_ref().map(|s| s.opens_count).unwrap_or(0),
        clicks_count: campaign
            .stats
            .as_ref()
            .map(|s| s.clicks_count)
            .unwrap_or(0),
        open_rate: RawRate {
            float: campaign
                .stats
                .as_ref()
                .map(|s| s.open_rate.float)
                .unwrap_or(0.0),
        },
        click_rate: RawRate {
            float: campaign
                .stats
                .as_ref()
                .map(|s| s.click_rate.float)
                .unwrap_or(0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_campaign_maps_status_and_stats() {
        let json = r#"{
            "id": "c-100",
            "name": "Spring Newsletter",
            "status": "sent",
            "emails": [{"subject": "Your Q2 outlook"}],
            "stats": {
                "sent": 412,
                "opens_count": 198,
                "clicks_count": 44,
                "open_rate": {"float": 0.48},
                "click_rate": {"float": 0.11}
            }
        }"#;
        let raw: RawCampaign = serde_json::from_str(json).unwrap();
        let campaign = Campaign::from(raw);
        assert_eq!(campaign.status, CampaignStatus::Sent);
        assert_eq!(campaign.subject.as_deref(), Some("Your Q2 outlook"));
        assert_eq!(campaign.recipients_count, 412);
        assert_eq!(campaign.opens_count, 198);
    }

    #[test]
    fn test_raw_campaign_without_stats() {
        let json = r#"{"id": "c-1", "name": "Draft", "status": "draft"}"#;
        let raw: RawCampaign = serde_json::from_str(json).unwrap();
        let campaign = Campaign::from(raw);
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.recipients_count, 0);
        assert!(campaign.subject.is_none());
    }

    #[test]
    fn test_subscriber_name_from_fields() {
        let json = r#"{
            "id": "s-1",
            "email": "dana@example.com",
            "status": "active",
            "fields": {"name": "Dana", "last_name": "Whitfield"}
        }"#;
        let raw: RawSubscriber = serde_json::from_str(json).unwrap();
        let sub = Subscriber::from(raw);
        assert_eq!(sub.name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_aggregate_stats_ignores_drafts() {
        let campaigns: Vec<RawCampaign> = serde_json::from_str(
            r#"[
                {"id": "1", "name": "a", "status": "sent",
                 "stats": {"sent": 100, "open_rate": {"float": 0.5}, "click_rate": {"float": 0.1}}},
                {"id": "2", "name": "b", "status": "sent",
                 "stats": {"sent": 120, "open_rate": {"float": 0.3}, "click_rate": {"float": 0.2}}},
                {"id": "3", "name": "c", "status": "draft"}
            ]"#,
        )
        .unwrap();
        let stats = aggregate_stats(&campaigns);
        assert_eq!(stats.campaigns_sent, 2);
        assert_eq!(stats.total_subscribers, 120);
        assert!((stats.average_open_rate - 0.4).abs() < 1e-9);
        assert!((stats.average_click_rate - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = aggregate_stats(&[]);
        assert_eq!(stats.campaigns_sent, 0);
        assert_eq!(stats.average_open_rate, 0.0);
    }
}
