//! Campaign-composition wizard routes.
//!
//! A session is created from a fresh Copper snapshot and mutated through
//! small, single-transition calls; every mutation answers with the full
//! updated view so the UI never derives state locally.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::segments::{FilterType, WizardView};
use crate::state::AppState;
use crate::types::Contact;

pub async fn create(State(state): State<Arc<AppState>>) -> Result<Json<WizardView>, ApiError> {
    let contacts = state.copper()?.list_contacts().await?;
    let view = state.sessions.create(contacts);
    log::info!(
        "wizard session {} created ({} contacts)",
        view.id,
        view.contact_count
    );
    Ok(Json(view))
}

pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>, ApiError> {
    state
        .sessions
        .with_session(id, |s| s.view())
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.sessions.remove(id) {
        Ok(Json(serde_json::json!({ "removed": true })))
    } else {
        Err(session_not_found(id))
    }
}

pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> Result<Json<WizardView>, ApiError> {
    state
        .sessions
        .with_session(id, |s| {
            s.add_tag(&tag);
            s.view()
        })
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(Uuid, String)>,
) -> Result<Json<WizardView>, ApiError> {
    state
        .sessions
        .with_session(id, |s| {
            s.remove_tag(&tag);
            s.view()
        })
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTypeBody {
    pub filter_type: FilterType,
}

pub async fn set_filter_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<FilterTypeBody>,
) -> Result<Json<WizardView>, ApiError> {
    state
        .sessions
        .with_session(id, |s| {
            s.set_filter_type(body.filter_type);
            s.view()
        })
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

pub async fn toggle_contact(
    State(state): State<Arc<AppState>>,
    Path((id, contact_id)): Path<(Uuid, u64)>,
) -> Result<Json<WizardView>, ApiError> {
    let result = state
        .sessions
        .with_session(id, |s| s.toggle_contact(contact_id).map(|_| s.view()))
        .ok_or_else(|| session_not_found(id))?;

    match result {
        Ok(view) => Ok(Json(view)),
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    }
}

pub async fn recipients(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    state
        .sessions
        .with_session(id, |s| s.recipients())
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("wizard session {}", id))
}
