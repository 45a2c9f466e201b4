use serde::{Deserialize, Serialize};

/// Donor tiers derived from cumulative points. Stored denormalized on the
/// donor row but always recomputed through `derive_level` so the stored and
/// displayed tier cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyLevel {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            LoyaltyLevel::Bronze => "BRONZE",
            LoyaltyLevel::Silver => "SILVER",
            LoyaltyLevel::Gold => "GOLD",
            LoyaltyLevel::Platinum => "PLATINUM",
        }
    }
}

pub fn derive_level(points: i64) -> LoyaltyLevel {
    if points >= 10_000 {
        LoyaltyLevel::Platinum
    } else if points >= 5_000 {
        LoyaltyLevel::Gold
    } else if points >= 1_000 {
        LoyaltyLevel::Silver
    } else {
        LoyaltyLevel::Bronze
    }
}

/// One point per `point_divisor` currency units, floored. The divisor comes
/// from configuration and is the same for every gateway path.
pub fn points_earned(amount: i64, point_divisor: i64) -> i64 {
    if point_divisor <= 0 || amount <= 0 {
        return 0;
    }
    amount / point_divisor
}
