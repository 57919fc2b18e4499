// HTTP request handlers
use crate::application::conditions_service::RefreshError;
use crate::domain::conditions::SiteConditions;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Maps refresh failures to the feed's `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(RefreshError);

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RefreshError::Fetch(e) => (StatusCode::BAD_GATEWAY, format!("Failed to fetch USGS data: {}", e)),
            RefreshError::Extract(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", e)),
        };
        tracing::error!(status = status.as_u16(), "{}", message);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Combined gage height and averaged water temperature for every site
pub async fn river_conditions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SiteConditions>>, ApiError> {
    let conditions = state.conditions_service.current_conditions().await?;
    Ok(Json(conditions))
}
