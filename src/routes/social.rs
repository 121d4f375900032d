//! Make.com relay routes.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::social::{GroupSyncRequest, RelayAck, SocialPost};
use crate::state::AppState;

pub async fn schedule_post(
    State(state): State<Arc<AppState>>,
    Json(post): Json<SocialPost>,
) -> Result<Json<RelayAck>, ApiError> {
    Ok(Json(state.make()?.schedule_post(&post).await?))
}

pub async fn group_sync(
    State(state): State<Arc<AppState>>,
    Json(sync): Json<GroupSyncRequest>,
) -> Result<Json<RelayAck>, ApiError> {
    Ok(Json(state.make()?.sync_group(&sync).await?))
}
