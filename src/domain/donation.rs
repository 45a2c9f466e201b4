use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    Pending,
    Success,
    Failed,
    Cancelled,
    Refunded,
}

impl DonationStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "PENDING",
            DonationStatus::Success => "SUCCESS",
            DonationStatus::Failed => "FAILED",
            DonationStatus::Cancelled => "CANCELLED",
            DonationStatus::Refunded => "REFUNDED",
        }
    }

    pub fn from_db_str(s: &str) -> DonationStatus {
        match s {
            "SUCCESS" => DonationStatus::Success,
            "FAILED" => DonationStatus::Failed,
            "CANCELLED" => DonationStatus::Cancelled,
            "REFUNDED" => DonationStatus::Refunded,
            _ => DonationStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Donation {
    pub donation_id: Uuid,
    pub campaign_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub anonymous: bool,
    pub amount: i64,
    pub currency: String,
    pub gateway: String,
    pub status: DonationStatus,
    pub provider_payment_ref: Option<String>,
    pub provider_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateDonationRequest {
    pub campaign_id: Uuid,
    pub donor_id: Option<Uuid>,
    #[serde(default)]
    pub anonymous: bool,
    pub amount: i64,
    pub currency: String,
    pub gateway: String,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDonationResponse {
    pub donation_id: Uuid,
    pub status: DonationStatus,
    pub gateway: String,
    pub payment_url: String,
    pub provider_payment_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
