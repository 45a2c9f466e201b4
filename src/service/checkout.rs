use crate::domain::donation::{
    CreateDonationRequest, CreateDonationResponse, DonationStatus, ErrorEnvelope, ErrorPayload,
};
use crate::gateways::bkash::BkashGateway;
use crate::gateways::shurjopay::ShurjopayGateway;
use crate::gateways::sslcommerz::SslCommerzGateway;
use crate::gateways::{DonationGateway, SessionRequest};
use crate::repo::campaigns_repo::CampaignsRepo;
use crate::repo::donations_repo::{DonationsRepo, NewDonation};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CheckoutService {
    pub donations_repo: DonationsRepo,
    pub campaigns_repo: CampaignsRepo,
    pub bkash: Arc<BkashGateway>,
    pub sslcommerz: Arc<SslCommerzGateway>,
    pub shurjopay: Arc<ShurjopayGateway>,
}

impl CheckoutService {
    pub async fn start(
        &self,
        req: CreateDonationRequest,
    ) -> Result<CreateDonationResponse, (axum::http::StatusCode, ErrorEnvelope)> {
        validate_request(&req)?;

        let adapter = self.adapter_for(&req.gateway).ok_or_else(|| {
            (
                axum::http::StatusCode::BAD_REQUEST,
                err("UNSUPPORTED_GATEWAY", "gateway must be one of bkash, sslcommerz, shurjopay"),
            )
        })?;

        let campaign = self
            .campaigns_repo
            .get(req.campaign_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                (
                    axum::http::StatusCode::NOT_FOUND,
                    err("CAMPAIGN_NOT_FOUND", "no such campaign"),
                )
            })?;

        let donation_id = Uuid::new_v4();
        let donor_id = if req.anonymous { None } else { req.donor_id };

        self.donations_repo
            .insert_pending(&NewDonation {
                donation_id,
                campaign_id: campaign.campaign_id,
                donor_id,
                anonymous: req.anonymous,
                amount: req.amount,
                currency: req.currency.clone(),
                gateway: req.gateway.clone(),
            })
            .await
            .map_err(internal)?;

        let session = adapter
            .create_session(SessionRequest {
                donation_id,
                amount: req.amount,
                currency: req.currency.clone(),
                customer_name: req.donor_name.unwrap_or_else(|| "Anonymous".to_string()),
                customer_email: req
                    .donor_email
                    .unwrap_or_else(|| "anonymous@donor.invalid".to_string()),
                customer_phone: req.donor_phone.unwrap_or_else(|| "01000000000".to_string()),
            })
            .await
            .map_err(|e| {
                tracing::warn!(donation_id = %donation_id, gateway = %req.gateway, "session create failed: {e}");
                (
                    axum::http::StatusCode::BAD_GATEWAY,
                    err("GATEWAY_UNAVAILABLE", &e.to_string()),
                )
            })?;

        if let Some(provider_ref) = &session.provider_payment_ref {
            self.donations_repo
                .set_provider_ref(donation_id, provider_ref)
                .await
                .map_err(internal)?;
        }

        Ok(CreateDonationResponse {
            donation_id,
            status: DonationStatus::Pending,
            gateway: req.gateway,
            payment_url: session.payment_url,
            provider_payment_ref: session.provider_payment_ref,
        })
    }

    fn adapter_for(&self, gateway: &str) -> Option<Arc<dyn DonationGateway>> {
        match gateway {
            "bkash" => Some(self.bkash.clone()),
            "sslcommerz" => Some(self.sslcommerz.clone()),
            "shurjopay" => Some(self.shurjopay.clone()),
            _ => None,
        }
    }
}

fn validate_request(
    req: &CreateDonationRequest,
) -> Result<(), (axum::http::StatusCode, ErrorEnvelope)> {
    if req.amount <= 0 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount must be > 0"),
        ));
    }
    if req.currency != "BDT" {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("INVALID_CURRENCY", "only BDT is supported"),
        ));
    }
    if !req.anonymous && req.donor_id.is_none() {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("MISSING_DONOR", "donor_id is required unless anonymous"),
        ));
    }
    Ok(())
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn internal(e: anyhow::Error) -> (axum::http::StatusCode, ErrorEnvelope) {
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", &e.to_string()),
    )
}
