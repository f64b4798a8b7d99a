//! User listing handler

use crate::error::ApiError;
use crate::storage::UserRecord;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    success: bool,
    data: Vec<UserRecord>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let data = state.db.list_records().await.map_err(|e| {
        error!("Listing users failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(UsersResponse {
        success: true,
        data,
    }))
}
