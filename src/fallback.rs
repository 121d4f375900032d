//! Explicit fallback wrapper for degradable vendor data.
//!
//! The analytics surfaces never block the dashboard: when a vendor call
//! fails they substitute a canned dataset. Every degradable response carries
//! its provenance so the client can label synthetic numbers instead of
//! presenting them as live.

use serde::Serialize;

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fetched from the vendor on this request.
    Live,
    /// Canned data substituted after a vendor failure.
    Fallback,
}

/// A payload tagged with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            source: DataSource::Live,
            data,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            source: DataSource::Fallback,
            data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Resolve a vendor result against its fallback dataset.
///
/// The error is logged and swallowed; the contract is that this never fails.
pub fn or_fallback<T, E: std::fmt::Display>(
    vendor: &str,
    result: Result<T, E>,
    fallback: impl FnOnce() -> T,
) -> Sourced<T> {
    match result {
        Ok(data) => Sourced::live(data),
        Err(e) => {
            log::warn!("{} unavailable, serving fallback data: {}", vendor, e);
            Sourced::fallback(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_fallback_keeps_live_data() {
        let out = or_fallback("GA", Ok::<_, String>(41), || 0);
        assert_eq!(out.source, DataSource::Live);
        assert_eq!(out.data, 41);
    }

    #[test]
    fn test_or_fallback_substitutes_on_error() {
        let out = or_fallback("GA", Err::<i32, _>("boom".to_string()), || 7);
        assert!(out.is_fallback());
        assert_eq!(out.data, 7);
    }

    #[test]
    fn test_sourced_serializes_flat() {
        #[derive(Serialize)]
        struct Body {
            visitors: u64,
        }
        let json = serde_json::to_value(Sourced::live(Body { visitors: 3 })).unwrap();
        assert_eq!(json["source"], "live");
        assert_eq!(json["visitors"], 3);
    }
}
