use thiserror::Error;
use uuid::Uuid;

/// Failures talking to a provider. `Verification` means the call itself did
/// not complete (network, timeout, 5xx): the payment outcome is unknown and
/// the donation must stay `PENDING` so the provider's retry can resolve it.
/// Only an explicit negative verdict from the provider marks a donation
/// failed; none of these variants ever do.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{gateway} verification call failed: {message}")]
    Verification {
        gateway: &'static str,
        message: String,
    },

    #[error("{gateway} rejected the merchant credentials")]
    Credentials { gateway: &'static str },

    #[error("{gateway} returned an unreadable response: {message}")]
    Malformed {
        gateway: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("donation {0} not found")]
    DonationNotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
