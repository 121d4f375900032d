//! HTTP surface: router assembly plus the health and dashboard handlers.

mod analytics;
mod clients;
mod copper;
mod mailerlite;
mod social;
mod wizard;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::services;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard))
        // Copper CRM
        .route("/api/copper/contacts", get(copper::list_contacts))
        .route("/api/copper/tags", get(copper::list_tags))
        .route("/api/copper/fields", get(copper::list_date_fields))
        // Analytics
        .route("/api/google-analytics", get(analytics::google_summary))
        .route("/api/wix-analytics", get(analytics::wix_summary))
        // MailerLite
        .route(
            "/api/mailerlite/campaigns",
            get(mailerlite::list_campaigns).post(mailerlite::create_campaign),
        )
        .route(
            "/api/mailerlite/campaigns/:id/send",
            post(mailerlite::send_campaign),
        )
        .route("/api/mailerlite/templates", get(mailerlite::list_templates))
        .route(
            "/api/mailerlite/groups",
            get(mailerlite::list_groups).post(mailerlite::create_group),
        )
        .route(
            "/api/mailerlite/groups/:id/subscribers",
            get(mailerlite::group_subscribers),
        )
        .route(
            "/api/mailerlite/subscribers",
            post(mailerlite::upsert_subscriber),
        )
        .route("/api/mailerlite/quick-send", post(mailerlite::quick_send))
        .route("/api/mailerlite/analytics", get(mailerlite::account_stats))
        // Built-in templates
        .route("/api/templates", get(mailerlite::builtin_templates))
        .route(
            "/api/templates/:id/render",
            post(mailerlite::render_template),
        )
        // Social / Make.com relay
        .route("/api/social/schedule", post(social::schedule_post))
        .route("/api/social/group-sync", post(social::group_sync))
        // Clients + AUM
        .route("/api/clients/recent", get(clients::recent))
        .route(
            "/api/clients/:id/custom-fields",
            get(clients::get_custom_fields).put(clients::put_custom_fields),
        )
        .route("/api/aum", get(clients::aum))
        // Campaign wizard
        .route("/api/wizard", post(wizard::create))
        .route(
            "/api/wizard/:id",
            get(wizard::view).delete(wizard::remove),
        )
        .route("/api/wizard/:id/tags/:tag", post(wizard::add_tag).delete(wizard::remove_tag))
        .route("/api/wizard/:id/filter-type", put(wizard::set_filter_type))
        .route(
            "/api/wizard/:id/contacts/:contact_id/toggle",
            post(wizard::toggle_contact),
        )
        .route("/api/wizard/:id/recipients", get(wizard::recipients))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    version: &'static str,
    vendors: crate::config::VendorStatus,
    active_wizard_sessions: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        vendors: state.config.vendor_status(),
        active_wizard_sessions: state.sessions.len(),
    })
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Json<services::dashboard::DashboardOverview> {
    Json(services::dashboard::load_overview(&state).await)
}
