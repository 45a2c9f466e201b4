use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

/// Status read for the donor-facing processing page; pending means a
/// callback has not resolved the donation yet.
pub async fn get_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.donations_repo.get(donation_id).await {
        Ok(Some(donation)) => (axum::http::StatusCode::OK, Json(donation)).into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "donation not found"})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
