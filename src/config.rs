//! Environment-variable configuration.
//!
//! All credentials live in the process environment and are read once at
//! startup. Each vendor gets an `Option<...Credentials>` block so a missing
//! credential disables that surface (the route answers with a descriptive
//! error) instead of failing the whole process.

use std::env;

use serde::Serialize;

/// Default listen port when `PORT` is unset.
const DEFAULT_PORT: u16 = 8080;

/// Copper CRM credentials (API key + the account email Copper requires
/// alongside it).
#[derive(Debug, Clone)]
pub struct CopperCredentials {
    pub api_key: String,
    pub email: String,
}

/// MailerLite Connect API token.
#[derive(Debug, Clone)]
pub struct MailerLiteCredentials {
    pub api_key: String,
}

/// Google Analytics access: GA4 property plus the OAuth2 client used to
/// refresh access tokens.
#[derive(Debug, Clone)]
pub struct GoogleAnalyticsCredentials {
    pub property_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Wix site analytics credentials.
#[derive(Debug, Clone)]
pub struct WixCredentials {
    pub api_key: String,
    pub site_id: String,
}

/// Make.com relay endpoints for social scheduling and contact group sync.
///
/// The group-sync bearer token is held here, server-side. It must never be
/// shipped to a browser.
#[derive(Debug, Clone)]
pub struct MakeCredentials {
    pub social_webhook_url: String,
    pub group_sync_webhook_url: String,
    pub group_sync_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub copper: Option<CopperCredentials>,
    pub mailerlite: Option<MailerLiteCredentials>,
    pub google_analytics: Option<GoogleAnalyticsCredentials>,
    pub wix: Option<WixCredentials>,
    pub make: Option<MakeCredentials>,
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// Never fails: every vendor block is optional. Malformed values (bad
    /// PORT, unparseable webhook URL) fall back to defaults with a warning.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let copper = match (var("COPPER_API_KEY"), var("COPPER_EMAIL")) {
            (Some(api_key), Some(email)) => Some(CopperCredentials { api_key, email }),
            (Some(_), None) | (None, Some(_)) => {
                log::warn!("Copper needs both COPPER_API_KEY and COPPER_EMAIL; surface disabled");
                None
            }
            _ => None,
        };

        let mailerlite = var("MAILERLITE_API_KEY").map(|api_key| MailerLiteCredentials { api_key });

        let google_analytics = match (
            var("GOOGLE_ANALYTICS_PROPERTY_ID"),
            var("GOOGLE_CLIENT_ID"),
            var("GOOGLE_CLIENT_SECRET"),
            var("GOOGLE_REFRESH_TOKEN"),
        ) {
            (Some(property_id), Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(GoogleAnalyticsCredentials {
                    property_id,
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            (Some(_), ..) => {
                log::warn!(
                    "GOOGLE_ANALYTICS_PROPERTY_ID set but OAuth client incomplete; \
                     analytics will serve fallback data"
                );
                None
            }
            _ => None,
        };

        let wix = match (var("WIX_API_KEY"), var("WIX_SITE_ID")) {
            (Some(api_key), Some(site_id)) => Some(WixCredentials { api_key, site_id }),
            _ => None,
        };

        let make = match var("MAKE_SOCIAL_WEBHOOK_URL") {
            Some(social_webhook_url) if parse_url_ok(&social_webhook_url) => {
                let group_sync_webhook_url = var("MAKE_GROUP_SYNC_WEBHOOK_URL")
                    .filter(|u| parse_url_ok(u))
                    .unwrap_or_else(|| social_webhook_url.clone());
                Some(MakeCredentials {
                    social_webhook_url,
                    group_sync_webhook_url,
                    group_sync_token: var("MAKE_GROUP_SYNC_TOKEN"),
                })
            }
            Some(bad) => {
                log::warn!("MAKE_SOCIAL_WEBHOOK_URL is not a valid URL: {}", bad);
                None
            }
            None => None,
        };

        Self {
            port,
            copper,
            mailerlite,
            google_analytics,
            wix,
            make,
        }
    }

    /// Per-vendor credential presence, for the health endpoint.
    pub fn vendor_status(&self) -> VendorStatus {
        VendorStatus {
            copper: self.copper.is_some(),
            mailerlite: self.mailerlite.is_some(),
            google_analytics: self.google_analytics.is_some(),
            wix: self.wix.is_some(),
            make: self.make.is_some(),
        }
    }
}

/// Which vendor surfaces have credentials configured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStatus {
    pub copper: bool,
    pub mailerlite: bool,
    pub google_analytics: bool,
    pub wix: bool,
    pub make: bool,
}

/// Read an env var, treating empty strings as unset.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_url_ok(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}
