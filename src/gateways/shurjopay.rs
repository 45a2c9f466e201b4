use crate::error::GatewayError;
use crate::gateways::token_cache::TokenCache;
use crate::gateways::{
    CheckoutSession, DonationGateway, PaymentOutcome, SessionRequest, VerifiedPayment,
};
use serde_json::json;
use std::time::Duration;

/// Credentials minted by the shurjoPay login call; secret-pay needs the
/// store id alongside the bearer token, so both are cached together.
#[derive(Debug, Clone)]
pub struct SpAuth {
    pub token: String,
    pub store_id: i64,
}

pub struct ShurjopayGateway {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub prefix: String,
    pub return_url: String,
    pub cancel_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
    pub token_cache: TokenCache<SpAuth>,
}

fn sp_code_of(value: &serde_json::Value) -> Option<String> {
    match value.get("sp_code") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Maps one element of the verification response array onto the canonical
/// outcome: 1000 completed, 1002 cancelled by the payer, other definitive
/// codes (1001 failed, 1011 declined, ...) failed.
pub fn interpret_verification(entry: &serde_json::Value) -> Result<VerifiedPayment, GatewayError> {
    let code = sp_code_of(entry).ok_or_else(|| GatewayError::Malformed {
        gateway: "shurjopay",
        message: "verification entry missing sp_code".to_string(),
    })?;

    let outcome = match code.as_str() {
        "1000" => PaymentOutcome::Success,
        "1002" => PaymentOutcome::Cancelled,
        _ => PaymentOutcome::Failed,
    };

    let provider_transaction_id = entry
        .get("bank_trx_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);
    let amount = match entry.get("amount") {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    };

    Ok(VerifiedPayment {
        outcome,
        provider_transaction_id,
        amount,
    })
}

impl ShurjopayGateway {
    async fn login(&self) -> Result<SpAuth, GatewayError> {
        if let Some(auth) = self.token_cache.get().await {
            return Ok(auth);
        }

        let url = format!("{}/api/get_token", self.base_url);
        let resp = self
            .client
            .post(url)
            .json(&json!({
                "username": self.username,
                "password": self.password,
            }))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "shurjopay",
                message: format!("login failed: {e}"),
            })?;

        let body: serde_json::Value = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "shurjopay",
            message: e.to_string(),
        })?;

        let token = body
            .get("token")
            .and_then(|v| v.as_str())
            .ok_or(GatewayError::Credentials { gateway: "shurjopay" })?
            .to_string();
        let store_id = body.get("store_id").and_then(|v| v.as_i64()).unwrap_or(1);
        let ttl = body
            .get("expires_in")
            .and_then(|v| v.as_u64())
            .unwrap_or(3600);

        let auth = SpAuth { token, store_id };
        self.token_cache
            .put(auth.clone(), Duration::from_secs(ttl))
            .await;
        Ok(auth)
    }
}

#[async_trait::async_trait]
impl DonationGateway for ShurjopayGateway {
    fn name(&self) -> &'static str {
        "shurjopay"
    }

    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, GatewayError> {
        let auth = self.login().await?;

        let resp = self
            .client
            .post(format!("{}/api/secret-pay", self.base_url))
            .bearer_auth(&auth.token)
            .json(&json!({
                "prefix": self.prefix,
                "token": auth.token,
                "store_id": auth.store_id,
                "return_url": self.return_url,
                "cancel_url": self.cancel_url,
                "amount": request.amount,
                "order_id": request.donation_id.to_string(),
                "currency": request.currency,
                "customer_name": request.customer_name,
                "customer_email": request.customer_email,
                "customer_phone": request.customer_phone,
                "customer_address": "N/A",
                "customer_city": "N/A",
                "client_ip": "0.0.0.0",
            }))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "shurjopay",
                message: format!("secret-pay failed: {e}"),
            })?;

        let body: serde_json::Value = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "shurjopay",
            message: e.to_string(),
        })?;

        let payment_url = body
            .get("checkout_url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::Malformed {
                gateway: "shurjopay",
                message: "secret-pay response missing checkout_url".to_string(),
            })?
            .to_string();
        let provider_payment_ref = body
            .get("sp_order_id")
            .and_then(|v| v.as_str())
            .map(ToString::to_string);

        Ok(CheckoutSession {
            payment_url,
            provider_payment_ref,
        })
    }

    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let auth = self.login().await?;

        let resp = self
            .client
            .post(format!("{}/api/verification", self.base_url))
            .bearer_auth(&auth.token)
            .json(&json!({ "order_id": reference }))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "shurjopay",
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Verification {
                gateway: "shurjopay",
                message: format!("verification returned HTTP {}", resp.status().as_u16()),
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "shurjopay",
            message: e.to_string(),
        })?;

        // The API wraps the result in a one-element array.
        let entry = match &body {
            serde_json::Value::Array(items) => items.first().cloned(),
            serde_json::Value::Object(_) => Some(body.clone()),
            _ => None,
        }
        .ok_or_else(|| GatewayError::Malformed {
            gateway: "shurjopay",
            message: "empty verification response".to_string(),
        })?;

        interpret_verification(&entry)
    }
}
