//! Copper CRM proxy routes.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::copper::{CopperClient, TagCount};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{Contact, CustomFieldDefinition};

pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.copper()?.list_contacts().await?;
    Ok(Json(contacts))
}

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagCount>>, ApiError> {
    let contacts = state.copper()?.list_contacts().await?;
    Ok(Json(CopperClient::tag_counts(&contacts)))
}

pub async fn list_date_fields(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomFieldDefinition>>, ApiError> {
    let fields = state.copper()?.date_field_definitions().await?;
    Ok(Json(fields))
}
