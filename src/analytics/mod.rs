//! Website analytics integrations (GA4 + Wix).
//!
//! Both surfaces are degradable: a vendor failure is logged and replaced
//! with the canned dataset below, tagged `source: fallback` so the dashboard
//! can label synthetic numbers. The demo never blocks on an analytics
//! outage.

pub mod google;
pub mod wix;

use crate::types::{AnalyticsSummary, TrafficSource};

/// Canned GA4-shaped summary served when Google Analytics is unreachable.
pub fn google_fallback_summary() -> AnalyticsSummary {
    AnalyticsSummary {
        page_views: 12_847,
        visitors: 4_231,
        sessions: 5_612,
        traffic_sources: vec![
            TrafficSource {
                source: "Organic Search".to_string(),
                sessions: 2_450,
            },
            TrafficSource {
                source: "Direct".to_string(),
                sessions: 1_680,
            },
            TrafficSource {
                source: "Referral".to_string(),
                sessions: 890,
            },
            TrafficSource {
                source: "Social".to_string(),
                sessions: 592,
            },
        ],
    }
}

/// Canned Wix-shaped summary served when Wix Analytics is unreachable.
pub fn wix_fallback_summary() -> AnalyticsSummary {
    AnalyticsSummary {
        page_views: 8_934,
        visitors: 3_102,
        sessions: 3_870,
        traffic_sources: vec![
            TrafficSource {
                source: "Organic Search".to_string(),
                sessions: 1_740,
            },
            TrafficSource {
                source: "Direct".to_string(),
                sessions: 1_260,
            },
            TrafficSource {
                source: "Social".to_string(),
                sessions: 870,
            },
        ],
    }
}
