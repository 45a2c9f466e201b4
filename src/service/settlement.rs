use crate::domain::donation::{Donation, DonationStatus};
use crate::domain::loyalty::{derive_level, points_earned};
use crate::error::SettlementError;
use crate::gateways::{PaymentOutcome, VerifiedPayment};
use crate::repo::campaigns_repo::CampaignsRepo;
use crate::repo::donations_repo::DonationsRepo;
use crate::repo::donors_repo::DonorsRepo;
use crate::repo::outbox_repo::OutboxRepo;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Result of one settlement attempt. `applied == false` means the call was
/// a no-op: a duplicate callback for an already-settled donation, or a
/// still-pending provider outcome.
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    pub applied: bool,
    pub donation: Donation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadySettled,
    OutcomePending,
}

/// What the transaction will do, decided from the locked donation row and
/// the canonical verdict. Pure so the idempotency/anonymity/point rules are
/// testable without a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementPlan {
    Skip(SkipReason),
    MarkFailed,
    MarkCancelled,
    Credit { loyalty_points: Option<i64> },
}

pub fn plan_settlement(
    donation: &Donation,
    verdict: &VerifiedPayment,
    point_divisor: i64,
) -> SettlementPlan {
    if donation.status != DonationStatus::Pending {
        return SettlementPlan::Skip(SkipReason::AlreadySettled);
    }

    match verdict.outcome {
        PaymentOutcome::Pending => SettlementPlan::Skip(SkipReason::OutcomePending),
        PaymentOutcome::Failed => SettlementPlan::MarkFailed,
        PaymentOutcome::Cancelled => SettlementPlan::MarkCancelled,
        PaymentOutcome::Success => SettlementPlan::Credit {
            loyalty_points: match donation.donor_id {
                Some(_) if !donation.anonymous => {
                    Some(points_earned(donation.amount, point_divisor))
                }
                _ => None,
            },
        },
    }
}

#[derive(Clone)]
pub struct SettlementService {
    pub pool: PgPool,
    pub point_divisor: i64,
}

impl SettlementService {
    /// Applies the financial and loyalty side-effects of one verified
    /// outcome, exactly once. Every write shares one transaction: donation
    /// status, campaign raised total, donor points/level, outbox event.
    /// The pending-status check happens on the locked row, so a callback
    /// arriving twice commits nothing the second time.
    pub async fn settle(
        &self,
        donation_id: Uuid,
        verdict: &VerifiedPayment,
    ) -> Result<SettlementReceipt, SettlementError> {
        let mut tx = self.pool.begin().await?;

        let donation = DonationsRepo::lock_for_settlement(&mut tx, donation_id)
            .await?
            .ok_or(SettlementError::DonationNotFound(donation_id))?;

        let plan = plan_settlement(&donation, verdict, self.point_divisor);

        match plan {
            SettlementPlan::Skip(reason) => {
                tx.rollback().await?;
                tracing::info!(
                    donation_id = %donation_id,
                    status = donation.status.as_db_str(),
                    ?reason,
                    "settlement skipped"
                );
                Ok(SettlementReceipt {
                    applied: false,
                    donation,
                })
            }
            SettlementPlan::MarkFailed | SettlementPlan::MarkCancelled => {
                let status = if plan == SettlementPlan::MarkFailed {
                    DonationStatus::Failed
                } else {
                    DonationStatus::Cancelled
                };

                DonationsRepo::mark_settled_tx(
                    &mut tx,
                    donation_id,
                    status,
                    verdict.provider_transaction_id.as_deref(),
                )
                .await?;
                OutboxRepo::insert_tx(
                    &mut tx,
                    donation_id,
                    "donation.closed",
                    json!({
                        "donation_id": donation_id,
                        "campaign_id": donation.campaign_id,
                        "gateway": donation.gateway.clone(),
                        "status": status.as_db_str(),
                    }),
                )
                .await?;
                tx.commit().await?;

                tracing::info!(donation_id = %donation_id, status = status.as_db_str(), "donation closed");
                Ok(SettlementReceipt {
                    applied: true,
                    donation: settled_copy(&donation, status, verdict),
                })
            }
            SettlementPlan::Credit { loyalty_points } => {
                if let Some(verified_amount) = verdict.amount {
                    if (verified_amount - donation.amount as f64).abs() > 0.01 {
                        tracing::warn!(
                            donation_id = %donation_id,
                            stored = donation.amount,
                            verified = verified_amount,
                            "verified amount differs from stored donation amount"
                        );
                    }
                }

                DonationsRepo::mark_settled_tx(
                    &mut tx,
                    donation_id,
                    DonationStatus::Success,
                    verdict.provider_transaction_id.as_deref(),
                )
                .await?;
                CampaignsRepo::add_to_raised_tx(&mut tx, donation.campaign_id, donation.amount)
                    .await?;

                if let (Some(donor_id), Some(earned)) = (donation.donor_id, loyalty_points) {
                    match DonorsRepo::add_points_tx(&mut tx, donor_id, earned).await? {
                        Some(points_after) => {
                            let level = derive_level(points_after);
                            DonorsRepo::set_level_tx(&mut tx, donor_id, level.as_db_str()).await?;
                            tracing::info!(
                                donor_id = %donor_id,
                                earned,
                                points_after,
                                level = level.as_db_str(),
                                "loyalty points awarded"
                            );
                        }
                        None => {
                            tracing::warn!(donor_id = %donor_id, "donation references unknown donor, points not awarded");
                        }
                    }
                }

                OutboxRepo::insert_tx(
                    &mut tx,
                    donation_id,
                    "donation.settled",
                    json!({
                        "donation_id": donation_id,
                        "campaign_id": donation.campaign_id,
                        "donor_id": donation.donor_id,
                        "amount": donation.amount,
                        "currency": donation.currency.clone(),
                        "gateway": donation.gateway.clone(),
                        "provider_transaction_id": verdict.provider_transaction_id.clone(),
                        "settled_at": Utc::now(),
                    }),
                )
                .await?;
                tx.commit().await?;

                tracing::info!(
                    donation_id = %donation_id,
                    campaign_id = %donation.campaign_id,
                    amount = donation.amount,
                    "donation settled"
                );
                Ok(SettlementReceipt {
                    applied: true,
                    donation: settled_copy(&donation, DonationStatus::Success, verdict),
                })
            }
        }
    }
}

fn settled_copy(donation: &Donation, status: DonationStatus, verdict: &VerifiedPayment) -> Donation {
    let mut updated = donation.clone();
    updated.status = status;
    if verdict.provider_transaction_id.is_some() {
        updated.provider_transaction_id = verdict.provider_transaction_id.clone();
    }
    updated.settled_at = Some(Utc::now());
    updated
}
