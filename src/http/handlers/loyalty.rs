use crate::domain::loyalty::{derive_level, LoyaltyLevel};
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LoyaltyView {
    pub donor_id: Uuid,
    pub name: String,
    pub points: i64,
    pub level: LoyaltyLevel,
}

/// The displayed tier is always derived from the stored points through the
/// same function settlement uses, so the two cannot disagree.
pub async fn get_loyalty(
    State(state): State<AppState>,
    Path(donor_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.donors_repo.get(donor_id).await {
        Ok(Some(donor)) => (
            axum::http::StatusCode::OK,
            Json(LoyaltyView {
                donor_id: donor.donor_id,
                name: donor.name,
                points: donor.points,
                level: derive_level(donor.points),
            }),
        )
            .into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "donor not found"})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
