use crate::error::GatewayError;
use crate::gateways::{
    CheckoutSession, DonationGateway, PaymentOutcome, SessionRequest, VerifiedPayment,
};

/// Local-run stand-in behind the same trait as the real providers.
pub struct MockGateway {
    pub behavior: String,
}

#[async_trait::async_trait]
impl DonationGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, GatewayError> {
        Ok(CheckoutSession {
            payment_url: format!("mock://checkout/{}", request.donation_id),
            provider_payment_ref: Some(format!("mock_ref_{}", uuid::Uuid::new_v4())),
        })
    }

    async fn verify_payment(&self, _reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let verdict = match self.behavior.as_str() {
            "ALWAYS_FAILURE" => VerifiedPayment::without_verification(PaymentOutcome::Failed),
            "ALWAYS_CANCEL" => VerifiedPayment::without_verification(PaymentOutcome::Cancelled),
            "ALWAYS_PENDING" => VerifiedPayment::without_verification(PaymentOutcome::Pending),
            "ALWAYS_UNREACHABLE" => {
                return Err(GatewayError::Verification {
                    gateway: "mock",
                    message: "mock outage".to_string(),
                })
            }
            _ => VerifiedPayment {
                outcome: PaymentOutcome::Success,
                provider_transaction_id: Some(format!("mock_trx_{}", uuid::Uuid::new_v4())),
                amount: None,
            },
        };

        Ok(verdict)
    }
}
