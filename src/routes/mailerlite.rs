//! MailerLite proxy routes plus the built-in template catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::fallback::{or_fallback, Sourced};
use crate::mailerlite::{CampaignDraft, QuickSendRequest, SubscriberUpsert};
use crate::state::AppState;
use crate::templates;
use crate::types::{Campaign, EmailStats, EmailTemplate, Group, Subscriber};

pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    Ok(Json(state.mailerlite()?.list_campaigns().await?))
}

pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<CampaignDraft>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.mailerlite()?.create_campaign(&draft).await?))
}

pub async fn send_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.mailerlite()?.send_campaign(&id).await?;
    Ok(Json(serde_json::json!({ "sent": true, "campaignId": id })))
}

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmailTemplate>>, ApiError> {
    Ok(Json(state.mailerlite()?.list_templates().await?))
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(state.mailerlite()?.list_groups().await?))
}

#[derive(serde::Deserialize)]
pub struct CreateGroupBody {
    pub name: String,
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateGroupBody>,
) -> Result<Json<Group>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("group name is empty".to_string()));
    }
    Ok(Json(state.mailerlite()?.create_group(&body.name).await?))
}

pub async fn group_subscribers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    Ok(Json(state.mailerlite()?.group_subscribers(&id).await?))
}

pub async fn upsert_subscriber(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubscriberUpsert>,
) -> Result<Json<Subscriber>, ApiError> {
    Ok(Json(state.mailerlite()?.upsert_subscriber(&body).await?))
}

pub async fn quick_send(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuickSendRequest>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.mailerlite()?.quick_send(&body).await?))
}

/// Account stats, degradable like the analytics surfaces.
pub async fn account_stats(State(state): State<Arc<AppState>>) -> Json<Sourced<EmailStats>> {
    let result = match state.mailerlite() {
        Ok(client) => client.account_stats().await,
        Err(e) => Err(e),
    };
    Json(or_fallback(
        "MailerLite stats",
        result,
        crate::mailerlite::fallback_stats,
    ))
}

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

pub async fn builtin_templates() -> Json<Vec<templates::BuiltinTemplate>> {
    Json(templates::builtin_templates())
}

#[derive(serde::Deserialize)]
pub struct RenderBody {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Render a built-in template with placeholder values; the result is the
/// HTML a quick-send can carry.
pub async fn render_template(
    Path(id): Path<String>,
    Json(body): Json<RenderBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template = templates::builtin_template(&id)
        .ok_or_else(|| ApiError::NotFound(format!("template '{}'", id)))?;
    let html = templates::render(template.html, &body.values);
    Ok(Json(serde_json::json!({ "id": id, "html": html })))
}
