use crate::error::GatewayError;
use crate::gateways::{
    CheckoutSession, DonationGateway, PaymentOutcome, SessionRequest, VerifiedPayment,
};
use serde::Deserialize;
use std::time::Duration;

/// SSLCommerz hosted checkout. Success callbacks carry a `val_id` which is
/// re-checked against the validator API server-side; the callback fields
/// themselves are client-posted and never decide a success.
pub struct SslCommerzGateway {
    pub base_url: String,
    pub store_id: String,
    pub store_passwd: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub ipn_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct SslSessionResponse {
    pub status: Option<String>,
    #[serde(rename = "GatewayPageURL")]
    pub gateway_page_url: Option<String>,
    pub sessionkey: Option<String>,
    #[serde(rename = "failedreason")]
    pub failed_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SslValidationResponse {
    pub status: Option<String>,
    pub tran_id: Option<String>,
    pub amount: Option<String>,
    pub bank_tran_id: Option<String>,
}

/// `VALID` is a fresh validation, `VALIDATED` a re-validation of the same
/// transaction (the IPN retry path hits this). Both are success; everything
/// else the validator says is a definitive failure.
pub fn interpret_validation(resp: &SslValidationResponse) -> Result<VerifiedPayment, GatewayError> {
    let status = resp.status.as_deref().ok_or_else(|| GatewayError::Malformed {
        gateway: "sslcommerz",
        message: "validator response missing status".to_string(),
    })?;

    let amount = resp.amount.as_deref().and_then(|a| a.parse::<f64>().ok());

    let outcome = match status {
        "VALID" | "VALIDATED" => PaymentOutcome::Success,
        _ => PaymentOutcome::Failed,
    };

    Ok(VerifiedPayment {
        outcome,
        provider_transaction_id: resp.bank_tran_id.clone(),
        amount,
    })
}

#[async_trait::async_trait]
impl DonationGateway for SslCommerzGateway {
    fn name(&self) -> &'static str {
        "sslcommerz"
    }

    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/gwprocess/v4/api.php", self.base_url);
        let amount = format!("{}.00", request.amount);
        let donation_id = request.donation_id.to_string();

        let params = [
            ("store_id", self.store_id.as_str()),
            ("store_passwd", self.store_passwd.as_str()),
            ("total_amount", amount.as_str()),
            ("currency", request.currency.as_str()),
            ("tran_id", donation_id.as_str()),
            ("success_url", self.success_url.as_str()),
            ("fail_url", self.fail_url.as_str()),
            ("cancel_url", self.cancel_url.as_str()),
            ("ipn_url", self.ipn_url.as_str()),
            ("cus_name", request.customer_name.as_str()),
            ("cus_email", request.customer_email.as_str()),
            ("cus_phone", request.customer_phone.as_str()),
            ("cus_add1", "N/A"),
            ("cus_city", "N/A"),
            ("cus_country", "Bangladesh"),
            ("shipping_method", "NO"),
            ("num_of_item", "1"),
            ("product_name", "donation"),
            ("product_category", "donation"),
            ("product_profile", "non-physical-goods"),
        ];

        let resp = self
            .client
            .post(url)
            .form(&params)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "sslcommerz",
                message: format!("session create failed: {e}"),
            })?;

        let body: SslSessionResponse = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "sslcommerz",
            message: e.to_string(),
        })?;

        if body.status.as_deref() != Some("SUCCESS") {
            return Err(GatewayError::Verification {
                gateway: "sslcommerz",
                message: format!(
                    "session rejected: {}",
                    body.failed_reason.unwrap_or_else(|| "unknown".to_string())
                ),
            });
        }

        let payment_url = body.gateway_page_url.ok_or_else(|| GatewayError::Malformed {
            gateway: "sslcommerz",
            message: "session response missing GatewayPageURL".to_string(),
        })?;

        Ok(CheckoutSession {
            payment_url,
            provider_payment_ref: body.sessionkey,
        })
    }

    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let url = format!(
            "{}/validator/api/validationserverAPI.php",
            self.base_url
        );

        let resp = self
            .client
            .get(url)
            .query(&[
                ("val_id", reference),
                ("store_id", self.store_id.as_str()),
                ("store_passwd", self.store_passwd.as_str()),
                ("format", "json"),
                ("v", "1"),
            ])
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "sslcommerz",
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Verification {
                gateway: "sslcommerz",
                message: format!("validator returned HTTP {}", resp.status().as_u16()),
            });
        }

        let body: SslValidationResponse = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "sslcommerz",
            message: e.to_string(),
        })?;

        interpret_validation(&body)
    }
}
