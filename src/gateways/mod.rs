use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod bkash;
pub mod mock;
pub mod shurjopay;
pub mod sslcommerz;
pub mod token_cache;

/// Gateway-agnostic verdict for one external payment reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    Success,
    Failed,
    Cancelled,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPayment {
    pub outcome: PaymentOutcome,
    pub provider_transaction_id: Option<String>,
    pub amount: Option<f64>,
}

impl VerifiedPayment {
    /// A verdict that did not come from a verification call, for callback
    /// legs that are definitive on their own (provider cancel/fail returns).
    pub fn without_verification(outcome: PaymentOutcome) -> VerifiedPayment {
        VerifiedPayment {
            outcome,
            provider_transaction_id: None,
            amount: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub donation_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub payment_url: String,
    pub provider_payment_ref: Option<String>,
}

#[async_trait::async_trait]
pub trait DonationGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Open a hosted-checkout session for a pending donation and return the
    /// URL the donor is redirected to.
    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, GatewayError>;

    /// Ask the provider's server-side verification endpoint what happened to
    /// `reference`. Callback payloads are never trusted for a success verdict.
    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError>;
}
