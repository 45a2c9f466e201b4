use crate::domain::donation::CreateDonationRequest;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn create_donation(
    State(state): State<AppState>,
    Json(req): Json<CreateDonationRequest>,
) -> impl IntoResponse {
    match state.checkout_service.start(req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}
