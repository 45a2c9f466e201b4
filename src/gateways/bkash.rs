use crate::error::GatewayError;
use crate::gateways::token_cache::TokenCache;
use crate::gateways::{
    CheckoutSession, DonationGateway, PaymentOutcome, SessionRequest, VerifiedPayment,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// bKash tokenized checkout. A grant token authorizes create/execute calls
/// and lives ~1h; it is cached per adapter instance, not process-wide.
pub struct BkashGateway {
    pub base_url: String,
    pub app_key: String,
    pub app_secret: String,
    pub username: String,
    pub password: String,
    pub callback_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
    pub token_cache: TokenCache<String>,
}

#[derive(Debug, Deserialize)]
pub struct BkashTokenResponse {
    pub id_token: Option<String>,
    pub expires_in: Option<u64>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BkashCreateResponse {
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
    #[serde(rename = "bkashURL")]
    pub bkash_url: Option<String>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
    #[serde(rename = "statusMessage")]
    pub status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BkashExecuteResponse {
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
    #[serde(rename = "transactionStatus")]
    pub transaction_status: Option<String>,
    #[serde(rename = "trxID")]
    pub trx_id: Option<String>,
    pub amount: Option<String>,
}

/// Maps an execute/query response onto the canonical outcome.
/// `statusCode "0000"` is the only success family; within it the
/// transaction must actually be `Completed`. `Initiated` means the payer
/// has not finished and the donation stays pending.
pub fn interpret_execute(resp: &BkashExecuteResponse) -> Result<VerifiedPayment, GatewayError> {
    let code = resp.status_code.as_deref().ok_or_else(|| GatewayError::Malformed {
        gateway: "bkash",
        message: "missing statusCode".to_string(),
    })?;

    let amount = resp.amount.as_deref().and_then(|a| a.parse::<f64>().ok());

    if code == "0000" {
        match resp.transaction_status.as_deref() {
            Some("Completed") => Ok(VerifiedPayment {
                outcome: PaymentOutcome::Success,
                provider_transaction_id: resp.trx_id.clone(),
                amount,
            }),
            Some("Initiated") | Some("Pending Authorized") => Ok(VerifiedPayment {
                outcome: PaymentOutcome::Pending,
                provider_transaction_id: resp.trx_id.clone(),
                amount,
            }),
            _ => Ok(VerifiedPayment {
                outcome: PaymentOutcome::Failed,
                provider_transaction_id: resp.trx_id.clone(),
                amount,
            }),
        }
    } else {
        // Any other definitive statusCode (2023 insufficient balance, 2029
        // duplicate, ...) is a provider-confirmed failure.
        Ok(VerifiedPayment {
            outcome: PaymentOutcome::Failed,
            provider_transaction_id: resp.trx_id.clone(),
            amount,
        })
    }
}

impl BkashGateway {
    async fn grant_token(&self) -> Result<String, GatewayError> {
        if let Some(token) = self.token_cache.get().await {
            return Ok(token);
        }

        let url = format!("{}/tokenized/checkout/token/grant", self.base_url);
        let resp = self
            .client
            .post(url)
            .header("username", &self.username)
            .header("password", &self.password)
            .json(&json!({
                "app_key": self.app_key,
                "app_secret": self.app_secret,
            }))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "bkash",
                message: format!("token grant failed: {e}"),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Credentials { gateway: "bkash" });
        }

        let body: BkashTokenResponse = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "bkash",
            message: e.to_string(),
        })?;

        let token = body.id_token.ok_or(GatewayError::Credentials { gateway: "bkash" })?;
        let ttl = Duration::from_secs(body.expires_in.unwrap_or(3600));
        self.token_cache.put(token.clone(), ttl).await;
        Ok(token)
    }

    async fn post_authed(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, GatewayError> {
        let token = self.grant_token().await?;
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("authorization", token)
            .header("x-app-key", &self.app_key)
            .json(&body)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| GatewayError::Verification {
                gateway: "bkash",
                message: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl DonationGateway for BkashGateway {
    fn name(&self) -> &'static str {
        "bkash"
    }

    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, GatewayError> {
        let resp = self
            .post_authed(
                "/tokenized/checkout/create",
                json!({
                    "mode": "0011",
                    "payerReference": request.customer_phone,
                    "callbackURL": self.callback_url,
                    "amount": request.amount.to_string(),
                    "currency": request.currency,
                    "intent": "sale",
                    "merchantInvoiceNumber": request.donation_id.to_string(),
                }),
            )
            .await?;

        let body: BkashCreateResponse = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "bkash",
            message: e.to_string(),
        })?;

        if body.status_code.as_deref() != Some("0000") {
            return Err(GatewayError::Verification {
                gateway: "bkash",
                message: format!(
                    "create rejected: {}",
                    body.status_message.unwrap_or_else(|| "unknown".to_string())
                ),
            });
        }

        match (body.bkash_url, body.payment_id) {
            (Some(url), payment_id) => Ok(CheckoutSession {
                payment_url: url,
                provider_payment_ref: payment_id,
            }),
            _ => Err(GatewayError::Malformed {
                gateway: "bkash",
                message: "create response missing bkashURL".to_string(),
            }),
        }
    }

    async fn verify_payment(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let resp = self
            .post_authed("/tokenized/checkout/execute", json!({ "paymentID": reference }))
            .await?;

        if !resp.status().is_success() {
            return Err(GatewayError::Verification {
                gateway: "bkash",
                message: format!("execute returned HTTP {}", resp.status().as_u16()),
            });
        }

        let body: BkashExecuteResponse = resp.json().await.map_err(|e| GatewayError::Malformed {
            gateway: "bkash",
            message: e.to_string(),
        })?;

        interpret_execute(&body)
    }
}
