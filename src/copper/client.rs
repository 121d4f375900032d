//! REST client for the Copper developer API.
//!
//! Auth is header-based: `X-PW-AccessToken` plus the account email in
//! `X-PW-UserEmail`. People are fetched through the paginated search
//! endpoint; Copper caps page size at 200.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::CopperCredentials;
use crate::error::ApiError;
use crate::http::{check_status, send_with_retry, RetryPolicy};
use crate::types::{Contact, CustomFieldDefinition};

const COPPER_API_BASE: &str = "https://api.copper.com/developer_api/v1";
const PAGE_SIZE: usize = 200;
const VENDOR: &str = "Copper";

/// Raw person record as Copper returns it.
#[derive(Debug, Deserialize)]
struct RawPerson {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    emails: Vec<RawEmail>,
    #[serde(default)]
    phone_numbers: Vec<RawPhone>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    date_modified: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawEmail {
    email: String,
}

#[derive(Debug, Deserialize)]
struct RawPhone {
    number: String,
}

#[derive(Debug, Deserialize)]
struct RawFieldDefinition {
    id: u64,
    name: String,
    data_type: String,
}

impl From<RawPerson> for Contact {
    fn from(raw: RawPerson) -> Self {
        Contact {
            id: raw.id,
            name: raw.name.unwrap_or_else(|| "Unnamed contact".to_string()),
            email: raw.emails.into_iter().next().map(|e| e.email),
            phone: raw.phone_numbers.into_iter().next().map(|p| p.number),
            company: raw.company_name,
            tags: raw.tags.into_iter().collect(),
            last_modified: raw.date_modified,
        }
    }
}

/// A tag with its contact count, for the wizard's tag picker.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

pub struct CopperClient {
    client: reqwest::Client,
    credentials: CopperCredentials,
    retry: RetryPolicy,
}

impl CopperClient {
    pub fn new(client: reqwest::Client, credentials: CopperCredentials) -> Self {
        Self {
            client,
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", COPPER_API_BASE, path))
            .header("X-PW-AccessToken", &self.credentials.api_key)
            .header("X-PW-UserEmail", &self.credentials.email)
            .header("X-PW-Application", "developer_api")
    }

    /// Fetch every person record, walking Copper's paginated search.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let mut contacts = Vec::new();
        let mut page = 1usize;

        loop {
            let body = serde_json::json!({
                "page_number": page,
                "page_size": PAGE_SIZE,
                "sort_by": "name",
            });
            let request = self
                .request(reqwest::Method::POST, "/people/search")
                .json(&body);
            let response = send_with_retry(VENDOR, request, &self.retry).await?;
            let response = check_status(VENDOR, response).await?;

            let batch: Vec<RawPerson> = response
                .json()
                .await
                .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;
            let batch_len = batch.len();
            contacts.extend(batch.into_iter().map(Contact::from));

            if batch_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        log::debug!("Copper: fetched {} contacts", contacts.len());
        Ok(contacts)
    }

    /// Distinct tags with counts across a contact set, including the
    /// synthetic "No Tag" bucket for untagged contacts.
    pub fn tag_counts(contacts: &[Contact]) -> Vec<TagCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut untagged = 0usize;
        for contact in contacts {
            if contact.tags.is_empty() {
                untagged += 1;
            }
            for tag in &contact.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut out: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        if untagged > 0 {
            out.push(TagCount {
                tag: super::NO_TAG.to_string(),
                count: untagged,
            });
        }
        out
    }

    /// Custom field definitions filtered for date/anniversary-like fields.
    pub async fn date_field_definitions(&self) -> Result<Vec<CustomFieldDefinition>, ApiError> {
        let request = self.request(reqwest::Method::GET, "/custom_field_definitions");
        let response = send_with_retry(VENDOR, request, &self.retry).await?;
        let response = check_status(VENDOR, response).await?;

        let raw: Vec<RawFieldDefinition> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(VENDOR, e))?;

        Ok(raw
            .into_iter()
            .filter(|f| is_date_like(&f.data_type, &f.name))
            .map(|f| CustomFieldDefinition {
                id: f.id,
                name: f.name,
                data_type: f.data_type,
            })
            .collect())
    }
}

/// A field counts as date-like if Copper types it as a Date, or its name
/// suggests a recurring client milestone.
fn is_date_like(data_type: &str, name: &str) -> bool {
    if data_type.eq_ignore_ascii_case("date") {
        return true;
    }
    let lowered = name.to_lowercase();
    ["anniversary", "birthday", "birthdate", "renewal"]
        .iter()
        .any(|needle| lowered.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, tags: &[&str]) -> Contact {
        Contact {
            id,
            name: format!("Contact {}", id),
            email: None,
            phone: None,
            company: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            last_modified: None,
        }
    }

    #[test]
    fn test_raw_person_maps_to_contact() {
        let json = r#"{
            "id": 42,
            "name": "Dana Whitfield",
            "emails": [{"email": "dana@example.com", "category": "work"}],
            "phone_numbers": [{"number": "555-0147", "category": "mobile"}],
            "company_name": "Whitfield Holdings",
            "tags": ["VIP", "Retired"],
            "date_modified": 1712000000
        }"#;
        let raw: RawPerson = serde_json::from_str(json).unwrap();
        let contact = Contact::from(raw);
        assert_eq!(contact.id, 42);
        assert_eq!(contact.email.as_deref(), Some("dana@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("555-0147"));
        assert!(contact.tags.contains("VIP"));
    }

    #[test]
    fn test_raw_person_tolerates_sparse_records() {
        let json = r#"{"id": 9}"#;
        let raw: RawPerson = serde_json::from_str(json).unwrap();
        let contact = Contact::from(raw);
        assert_eq!(contact.name, "Unnamed contact");
        assert!(contact.tags.is_empty());
    }

    #[test]
    fn test_tag_counts_include_no_tag_bucket() {
        let contacts = vec![
            contact(1, &["VIP"]),
            contact(2, &["VIP", "Prospect"]),
            contact(3, &[]),
        ];
        let counts = CopperClient::tag_counts(&contacts);
        let vip = counts.iter().find(|c| c.tag == "VIP").unwrap();
        assert_eq!(vip.count, 2);
        let no_tag = counts.iter().find(|c| c.tag == super::super::NO_TAG).unwrap();
        assert_eq!(no_tag.count, 1);
    }

    #[test]
    fn test_tag_counts_omit_empty_no_tag_bucket() {
        let contacts = vec![contact(1, &["VIP"])];
        let counts = CopperClient::tag_counts(&contacts);
        assert!(counts.iter().all(|c| c.tag != super::super::NO_TAG));
    }

    #[test]
    fn test_is_date_like() {
        assert!(is_date_like("Date", "Client Since"));
        assert!(is_date_like("String", "Wedding Anniversary"));
        assert!(is_date_like("String", "birthday"));
        assert!(!is_date_like("String", "Risk Profile"));
    }

}
