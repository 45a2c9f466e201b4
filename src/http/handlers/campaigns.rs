use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CampaignView {
    pub campaign_id: Uuid,
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.campaigns_repo.get(campaign_id).await {
        Ok(Some(c)) => (
            axum::http::StatusCode::OK,
            Json(CampaignView {
                campaign_id: c.campaign_id,
                title: c.title,
                goal_amount: c.goal_amount,
                raised_amount: c.raised_amount,
            }),
        )
            .into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "campaign not found"})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
