//! Make.com relay for social scheduling and contact group sync.
//!
//! Two webhook flows: scheduled social posts, and pushing a wizard's
//! selected contacts into the MailerLite group-creation scenario. The
//! group-sync bearer token lives in server config only and is attached to
//! the outbound call here; it must never reach a browser.

use serde::{Deserialize, Serialize};

use crate::config::MakeCredentials;
use crate::error::ApiError;
use crate::http::{check_status, send_with_retry, RetryPolicy};
use crate::types::Contact;

const VENDOR: &str = "Make.com";

/// A social post to relay for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub text: String,
    /// Target networks, e.g. ["facebook", "linkedin"].
    #[serde(default)]
    pub platforms: Vec<String>,
    /// RFC 3339 timestamp; omitted means post now.
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

/// Wizard output pushed into the group-creation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSyncRequest {
    pub group_name: String,
    pub contacts: Vec<GroupSyncContact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSyncContact {
    pub name: String,
    pub email: String,
}

impl GroupSyncContact {
    /// Contacts without an email address can't be synced into an email group.
    pub fn from_contact(contact: &Contact) -> Option<Self> {
        contact.email.as_ref().map(|email| Self {
            name: contact.name.clone(),
            email: email.clone(),
        })
    }
}

/// Acknowledgement returned to the dashboard after a relay call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayAck {
    pub forwarded: bool,
    pub detail: String,
}

pub struct MakeRelay {
    client: reqwest::Client,
    credentials: MakeCredentials,
    retry: RetryPolicy,
}

impl MakeRelay {
    pub fn new(client: reqwest::Client, credentials: MakeCredentials) -> Self {
        Self {
            client,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    /// Forward a social post to the scheduling webhook.
    pub async fn schedule_post(&self, post: &SocialPost) -> Result<RelayAck, ApiError> {
        if post.text.trim().is_empty() {
            return Err(ApiError::BadRequest("post text is empty".to_string()));
        }

        let request = self
            .client
            .post(&self.credentials.social_webhook_url)
            .json(post);
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        check_status(VENDOR, response).await?;

        log::info!(
            "Make.com: relayed social post for {} platform(s)",
            post.platforms.len().max(1)
        );
        Ok(RelayAck {
            forwarded: true,
            detail: "post forwarded to scheduler".to_string(),
        })
    }

    /// Push selected contacts into the group-creation scenario.
    pub async fn sync_group(&self, sync: &GroupSyncRequest) -> Result<RelayAck, ApiError> {
        if sync.group_name.trim().is_empty() {
            return Err(ApiError::BadRequest("group name is empty".to_string()));
        }
        if sync.contacts.is_empty() {
            return Err(ApiError::BadRequest(
                "no contacts selected for group sync".to_string(),
            ));
        }

        let mut request = self
            .client
            .post(&self.credentials.group_sync_webhook_url)
            .json(sync);
        if let Some(token) = &self.credentials.group_sync_token {
            request = request.bearer_auth(token);
        }
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        check_status(VENDOR, response).await?;

        log::info!(
            "Make.com: synced {} contact(s) into group '{}'",
            sync.contacts.len(),
            sync.group_name
        );
        Ok(RelayAck {
            forwarded: true,
            detail: format!("{} contacts forwarded", sync.contacts.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_group_sync_contact_requires_email() {
        let with_email = Contact {
            id: 1,
            name: "Dana Whitfield".to_string(),
            email: Some("dana@example.com".to_string()),
            phone: None,
            company: None,
            tags: BTreeSet::new(),
            last_modified: None,
        };
        let without_email = Contact {
            email: None,
            ..with_email.clone()
        };

        assert!(GroupSyncContact::from_contact(&with_email).is_some());
        assert!(GroupSyncContact::from_contact(&without_email).is_none());
    }

    #[test]
    fn test_social_post_deserializes_minimal_body() {
        let post: SocialPost = serde_json::from_str(r#"{"text": "Market update"}"#).unwrap();
        assert!(post.platforms.is_empty());
        assert!(post.scheduled_at.is_none());
    }
}
