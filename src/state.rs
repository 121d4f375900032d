//! Shared application state.
//!
//! Built once at startup and handed to every route. Vendor clients exist
//! only when their credentials are configured; the accessors below turn an
//! absent client into the MissingCredential error the routes return.

use std::sync::{Arc, Mutex};

use crate::analytics::google::GoogleAnalyticsClient;
use crate::analytics::wix::WixClient;
use crate::cache::CacheDb;
use crate::config::Config;
use crate::copper::CopperClient;
use crate::error::ApiError;
use crate::mailerlite::MailerLiteClient;
use crate::segments::SessionStore;
use crate::social::MakeRelay;

pub struct AppState {
    pub config: Config,
    copper: Option<CopperClient>,
    mailerlite: Option<MailerLiteClient>,
    google_analytics: Option<GoogleAnalyticsClient>,
    wix: Option<WixClient>,
    make: Option<MakeRelay>,
    cache: Mutex<Option<CacheDb>>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = crate::http::build_client()?;

        let copper = config
            .copper
            .clone()
            .map(|creds| CopperClient::new(http.clone(), creds));
        let mailerlite = config
            .mailerlite
            .clone()
            .map(|creds| MailerLiteClient::new(http.clone(), creds));
        let google_analytics = config
            .google_analytics
            .clone()
            .map(|creds| GoogleAnalyticsClient::new(http.clone(), creds));
        let wix = config
            .wix
            .clone()
            .map(|creds| WixClient::new(http.clone(), creds));
        let make = config
            .make
            .clone()
            .map(|creds| MakeRelay::new(http.clone(), creds));

        let cache = match CacheDb::open_default() {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open local cache: {}. Cache features disabled.", e);
                None
            }
        };

        Ok(Self {
            config,
            copper,
            mailerlite,
            google_analytics,
            wix,
            make,
            cache: Mutex::new(cache),
            sessions: SessionStore::new(),
        })
    }

    pub fn copper(&self) -> Result<&CopperClient, ApiError> {
        self.copper
            .as_ref()
            .ok_or(ApiError::MissingCredential { vendor: "Copper" })
    }

    pub fn mailerlite(&self) -> Result<&MailerLiteClient, ApiError> {
        self.mailerlite.as_ref().ok_or(ApiError::MissingCredential {
            vendor: "MailerLite",
        })
    }

    pub fn google_analytics(&self) -> Result<&GoogleAnalyticsClient, ApiError> {
        self.google_analytics
            .as_ref()
            .ok_or(ApiError::MissingCredential {
                vendor: "Google Analytics",
            })
    }

    pub fn wix(&self) -> Result<&WixClient, ApiError> {
        self.wix
            .as_ref()
            .ok_or(ApiError::MissingCredential { vendor: "Wix" })
    }

    pub fn make(&self) -> Result<&MakeRelay, ApiError> {
        self.make
            .as_ref()
            .ok_or(ApiError::MissingCredential { vendor: "Make.com" })
    }

    /// Run a closure against the cache, mapping an unavailable or poisoned
    /// cache to an ApiError.
    pub fn with_cache<T>(&self, f: impl FnOnce(&CacheDb) -> Result<T, String>) -> Result<T, ApiError> {
        let guard = self
            .cache
            .lock()
            .map_err(|_| ApiError::Cache("cache lock poisoned".to_string()))?;
        let db = guard
            .as_ref()
            .ok_or_else(|| ApiError::Cache("local cache unavailable".to_string()))?;
        f(db).map_err(ApiError::Cache)
    }

    /// Like `with_cache`, but treats an unavailable cache as a miss instead
    /// of an error. Used on read paths that can fall through to the vendor.
    pub fn try_cache<T>(&self, f: impl FnOnce(&CacheDb) -> Option<T>) -> Option<T> {
        let guard = self.cache.lock().ok()?;
        guard.as_ref().and_then(f)
    }

    #[cfg(test)]
    pub fn for_tests(cache: CacheDb) -> Self {
        Self {
            config: Config {
                port: 0,
                copper: None,
                mailerlite: None,
                google_analytics: None,
                wix: None,
                make: None,
            },
            copper: None,
            mailerlite: None,
            google_analytics: None,
            wix: None,
            make: None,
            cache: Mutex::new(Some(cache)),
            sessions: SessionStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_vendor_yields_missing_credential() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDb::open(&dir.path().join("cache.db")).unwrap();
        let state = AppState::for_tests(cache);

        assert!(matches!(
            state.copper(),
            Err(ApiError::MissingCredential { vendor: "Copper" })
        ));
        assert!(matches!(
            state.mailerlite(),
            Err(ApiError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_with_cache_runs_against_open_db() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDb::open(&dir.path().join("cache.db")).unwrap();
        let state = AppState::for_tests(cache);

        let fields = state
            .with_cache(|db| {
                db.upsert_custom_fields(
                    1,
                    &crate::types::ClientCustomFields {
                        notes: Some("note".to_string()),
                        aum_override: None,
                    },
                )?;
                Ok(db.get_custom_fields(1))
            })
            .unwrap();
        assert!(fields.is_some());
    }
}
