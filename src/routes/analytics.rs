//! Analytics proxy routes.
//!
//! Both endpoints honor the fallback contract: a vendor failure (or missing
//! credentials) degrades to the canned dataset instead of erroring, tagged
//! with its provenance.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::analytics::{google_fallback_summary, wix_fallback_summary};
use crate::fallback::{or_fallback, Sourced};
use crate::state::AppState;
use crate::types::AnalyticsSummary;

pub async fn google_summary(
    State(state): State<Arc<AppState>>,
) -> Json<Sourced<AnalyticsSummary>> {
    let result = match state.google_analytics() {
        Ok(client) => client.traffic_summary().await,
        Err(e) => Err(e),
    };
    Json(or_fallback("Google Analytics", result, google_fallback_summary))
}

pub async fn wix_summary(State(state): State<Arc<AppState>>) -> Json<Sourced<AnalyticsSummary>> {
    let result = match state.wix() {
        Ok(client) => client.traffic_summary().await,
        Err(e) => Err(e),
    };
    Json(or_fallback("Wix Analytics", result, wix_fallback_summary))
}
