use crate::domain::donation::Donation;
use crate::error::{GatewayError, SettlementError};
use crate::gateways::{DonationGateway, PaymentOutcome, VerifiedPayment};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

// bKash ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BkashCallbackQuery {
    #[serde(rename = "paymentID")]
    pub payment_id: String,
    pub status: String,
}

/// bKash redirects the payer here with its paymentID and a coarse status.
/// Success is never taken from the query string: the execute API decides.
/// Negative legs settle directly; execute is undefined for abandoned
/// payments, and a spoofed negative can only close a donation that would
/// otherwise expire, never credit one.
pub async fn bkash_callback(
    State(state): State<AppState>,
    Query(query): Query<BkashCallbackQuery>,
) -> Response {
    let donation = match find_by_ref(&state, "bkash", &query.payment_id).await {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match query.status.as_str() {
        "success" => {
            verify_then_settle(&state, state.bkash.as_ref(), donation, &query.payment_id).await
        }
        "cancel" => {
            settle_json(
                &state,
                donation.donation_id,
                &VerifiedPayment::without_verification(PaymentOutcome::Cancelled),
            )
            .await
        }
        _ => {
            settle_json(
                &state,
                donation.donation_id,
                &VerifiedPayment::without_verification(PaymentOutcome::Failed),
            )
            .await
        }
    }
}

// SSLCommerz -----------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SslCallbackForm {
    pub tran_id: Option<String>,
    pub val_id: Option<String>,
}

/// Success leg: the posted fields only carry the validation handle; the
/// verdict comes from the validator API. The payer is redirected to the
/// frontend result page in every case (SSLCommerz expects a redirect).
pub async fn sslcommerz_success(
    State(state): State<AppState>,
    Form(form): Form<SslCallbackForm>,
) -> Response {
    let Some(donation_id) = parse_tran_id(&form) else {
        return redirect_result(&state, None, "failed");
    };
    let Some(val_id) = form.val_id else {
        tracing::warn!(donation_id = %donation_id, "sslcommerz success callback without val_id");
        return redirect_result(&state, Some(donation_id), "processing");
    };

    match state.sslcommerz.verify_payment(&val_id).await {
        Ok(verdict) => {
            let slug = match settle(&state, donation_id, &verdict).await {
                Ok(receipt) => result_slug(&receipt.donation),
                Err(e) => return settlement_error_redirect(&state, donation_id, e),
            };
            redirect_result(&state, Some(donation_id), slug)
        }
        Err(e) => {
            // Indeterminate: stay pending, let the IPN retry resolve it.
            tracing::warn!(donation_id = %donation_id, "sslcommerz validation failed: {e}");
            redirect_result(&state, Some(donation_id), "processing")
        }
    }
}

pub async fn sslcommerz_fail(
    State(state): State<AppState>,
    Form(form): Form<SslCallbackForm>,
) -> Response {
    close_from_redirect_leg(&state, &form, PaymentOutcome::Failed).await
}

pub async fn sslcommerz_cancel(
    State(state): State<AppState>,
    Form(form): Form<SslCallbackForm>,
) -> Response {
    close_from_redirect_leg(&state, &form, PaymentOutcome::Cancelled).await
}

/// Server-to-server retry channel; same verification path as the success
/// leg but answered in JSON so the gateway can tell delivery succeeded.
pub async fn sslcommerz_ipn(
    State(state): State<AppState>,
    Form(form): Form<SslCallbackForm>,
) -> Response {
    let Some(donation_id) = parse_tran_id(&form) else {
        return (
            axum::http::StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing or malformed tran_id"})),
        )
            .into_response();
    };
    let Some(val_id) = form.val_id else {
        return (
            axum::http::StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing val_id"})),
        )
            .into_response();
    };

    match state.sslcommerz.verify_payment(&val_id).await {
        Ok(verdict) => settle_json(&state, donation_id, &verdict).await,
        Err(e) => gateway_unavailable_json(donation_id, e),
    }
}

async fn close_from_redirect_leg(
    state: &AppState,
    form: &SslCallbackForm,
    outcome: PaymentOutcome,
) -> Response {
    let Some(donation_id) = parse_tran_id(form) else {
        return redirect_result(state, None, "failed");
    };

    let verdict = VerifiedPayment::without_verification(outcome);
    let slug = match settle(state, donation_id, &verdict).await {
        Ok(receipt) => result_slug(&receipt.donation),
        Err(e) => return settlement_error_redirect(state, donation_id, e),
    };
    redirect_result(state, Some(donation_id), slug)
}

fn parse_tran_id(form: &SslCallbackForm) -> Option<Uuid> {
    form.tran_id.as_deref().and_then(|t| t.parse::<Uuid>().ok())
}

// shurjoPay ------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ShurjopayReturnQuery {
    pub order_id: String,
}

pub async fn shurjopay_return(
    State(state): State<AppState>,
    Query(query): Query<ShurjopayReturnQuery>,
) -> Response {
    let donation = match find_by_ref(&state, "shurjopay", &query.order_id).await {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    verify_then_settle(&state, state.shurjopay.as_ref(), donation, &query.order_id).await
}

// Shared plumbing ------------------------------------------------------

async fn find_by_ref(state: &AppState, gateway: &str, provider_ref: &str) -> Result<Donation, Response> {
    match state.donations_repo.find_by_provider_ref(gateway, provider_ref).await {
        Ok(Some(donation)) => Ok(donation),
        Ok(None) => {
            tracing::warn!(gateway, provider_ref, "callback for unknown payment reference");
            Err((
                axum::http::StatusCode::NOT_FOUND,
                Json(json!({"error": "unknown payment reference"})),
            )
                .into_response())
        }
        Err(e) => Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response()),
    }
}

async fn verify_then_settle(
    state: &AppState,
    adapter: &dyn DonationGateway,
    donation: Donation,
    reference: &str,
) -> Response {
    match adapter.verify_payment(reference).await {
        Ok(verdict) => settle_json(state, donation.donation_id, &verdict).await,
        Err(e) => {
            tracing::warn!(
                donation_id = %donation.donation_id,
                gateway = adapter.name(),
                "verification call failed, donation stays pending: {e}"
            );
            gateway_unavailable_json(donation.donation_id, e)
        }
    }
}

async fn settle(
    state: &AppState,
    donation_id: Uuid,
    verdict: &VerifiedPayment,
) -> Result<crate::service::settlement::SettlementReceipt, SettlementError> {
    state.settlement_service.settle(donation_id, verdict).await
}

async fn settle_json(state: &AppState, donation_id: Uuid, verdict: &VerifiedPayment) -> Response {
    match settle(state, donation_id, verdict).await {
        Ok(receipt) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "donation_id": receipt.donation.donation_id,
                "status": receipt.donation.status,
                "applied": receipt.applied,
            })),
        )
            .into_response(),
        Err(SettlementError::DonationNotFound(id)) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(json!({"error": format!("donation {id} not found")})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

fn gateway_unavailable_json(donation_id: Uuid, e: GatewayError) -> Response {
    (
        axum::http::StatusCode::BAD_GATEWAY,
        Json(json!({
            "donation_id": donation_id,
            "status": "PENDING",
            "note": "verification unavailable, retry later",
            "error": e.to_string(),
        })),
    )
        .into_response()
}

fn settlement_error_redirect(state: &AppState, donation_id: Uuid, e: SettlementError) -> Response {
    tracing::error!(donation_id = %donation_id, "settlement failed: {e}");
    redirect_result(state, Some(donation_id), "failed")
}

fn result_slug(donation: &Donation) -> &'static str {
    match donation.status {
        crate::domain::donation::DonationStatus::Success => "success",
        crate::domain::donation::DonationStatus::Cancelled => "cancelled",
        crate::domain::donation::DonationStatus::Pending => "processing",
        _ => "failed",
    }
}

fn redirect_result(state: &AppState, donation_id: Option<Uuid>, slug: &str) -> Response {
    let url = match donation_id {
        Some(id) => format!("{}/donation-result/{}?status={}", state.frontend_base_url, id, slug),
        None => format!("{}/donation-result?status={}", state.frontend_base_url, slug),
    };
    Redirect::to(&url).into_response()
}
