//! Error types for the HTTP boundary.
//!
//! Errors are classified by origin:
//! - MissingCredential: a vendor surface was called without its env vars
//! - Upstream: the vendor answered non-2xx (status is mirrored to the client)
//! - Transport: the request never completed (DNS, TLS, timeout)
//! - Parse: the vendor answered 2xx with a body we could not decode

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{vendor} credentials are not configured")]
    MissingCredential { vendor: &'static str },

    #[error("{vendor} API error {status}")]
    Upstream {
        vendor: &'static str,
        status: u16,
        detail: String,
    },

    #[error("{vendor} request failed: {detail}")]
    Transport { vendor: &'static str, detail: String },

    #[error("Failed to parse {vendor} response: {detail}")]
    Parse { vendor: &'static str, detail: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl ApiError {
    /// Classify a reqwest failure for a given vendor.
    pub fn from_reqwest(vendor: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse {
                vendor,
                detail: err.to_string(),
            }
        } else {
            ApiError::Transport {
                vendor,
                detail: err.to_string(),
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            // Missing credentials surface as 500 with a descriptive message.
            ApiError::MissingCredential { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Transport { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Parse { .. } | ApiError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            ApiError::Upstream { detail, .. } => Some(detail.clone()),
            _ => None,
        };
        log::error!("request failed: {}", self);
        let body = serde_json::json!({
            "error": self.to_string(),
            "details": details,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_mirrored() {
        let err = ApiError::Upstream {
            vendor: "Copper",
            status: 429,
            detail: "rate limited".into(),
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_unmappable_upstream_status_becomes_500() {
        let err = ApiError::Upstream {
            vendor: "Copper",
            status: 99,
            detail: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_credential_is_500() {
        let err = ApiError::MissingCredential { vendor: "MailerLite" };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("MailerLite"));
    }
}
