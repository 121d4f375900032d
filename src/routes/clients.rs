//! Client list, custom-field overrides, and the AUM book.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::services::clients as svc;
use crate::state::AppState;
use crate::types::{AumRecord, ClientCustomFields, Contact};

pub async fn recent(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(svc::recent_clients(&state).await?))
}

pub async fn aum(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AumRecord>>, ApiError> {
    Ok(Json(svc::aum_summary(&state).await?))
}

pub async fn get_custom_fields(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ClientCustomFields>, ApiError> {
    // Absent rows read as empty overrides.
    let fields = state.try_cache(|db| db.get_custom_fields(id)).unwrap_or_default();
    Ok(Json(fields))
}

pub async fn put_custom_fields(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(fields): Json<ClientCustomFields>,
) -> Result<Json<ClientCustomFields>, ApiError> {
    state.with_cache(|db| db.upsert_custom_fields(id, &fields))?;
    Ok(Json(fields))
}
