use donation_gateway::domain::donation::{Donation, DonationStatus};
use donation_gateway::gateways::{PaymentOutcome, VerifiedPayment};
use donation_gateway::service::settlement::{plan_settlement, SettlementPlan, SkipReason};
use uuid::Uuid;

fn donation(status: DonationStatus, donor_id: Option<Uuid>, anonymous: bool) -> Donation {
    Donation {
        donation_id: Uuid::new_v4(),
        campaign_id: Uuid::new_v4(),
        donor_id,
        anonymous,
        amount: 2_500,
        currency: "BDT".to_string(),
        gateway: "bkash".to_string(),
        status,
        provider_payment_ref: Some("TR001".to_string()),
        provider_transaction_id: None,
        created_at: chrono::Utc::now(),
        settled_at: None,
    }
}

fn verdict(outcome: PaymentOutcome) -> VerifiedPayment {
    VerifiedPayment {
        outcome,
        provider_transaction_id: Some("9BC123".to_string()),
        amount: Some(2_500.0),
    }
}

#[test]
fn success_credits_campaign_and_donor() {
    let d = donation(DonationStatus::Pending, Some(Uuid::new_v4()), false);
    let plan = plan_settlement(&d, &verdict(PaymentOutcome::Success), 100);
    assert_eq!(
        plan,
        SettlementPlan::Credit {
            loyalty_points: Some(25)
        }
    );
}

#[test]
fn anonymous_success_skips_loyalty() {
    let d = donation(DonationStatus::Pending, Some(Uuid::new_v4()), true);
    let plan = plan_settlement(&d, &verdict(PaymentOutcome::Success), 100);
    assert_eq!(plan, SettlementPlan::Credit { loyalty_points: None });
}

#[test]
fn donorless_success_skips_loyalty() {
    let d = donation(DonationStatus::Pending, None, false);
    let plan = plan_settlement(&d, &verdict(PaymentOutcome::Success), 100);
    assert_eq!(plan, SettlementPlan::Credit { loyalty_points: None });
}

#[test]
fn already_settled_donation_is_a_noop() {
    for status in [
        DonationStatus::Success,
        DonationStatus::Failed,
        DonationStatus::Cancelled,
        DonationStatus::Refunded,
    ] {
        let d = donation(status, Some(Uuid::new_v4()), false);
        let plan = plan_settlement(&d, &verdict(PaymentOutcome::Success), 100);
        assert_eq!(plan, SettlementPlan::Skip(SkipReason::AlreadySettled));
    }
}

#[test]
fn pending_outcome_defers() {
    let d = donation(DonationStatus::Pending, Some(Uuid::new_v4()), false);
    let plan = plan_settlement(&d, &verdict(PaymentOutcome::Pending), 100);
    assert_eq!(plan, SettlementPlan::Skip(SkipReason::OutcomePending));
}

#[test]
fn failed_and_cancelled_never_credit() {
    let d = donation(DonationStatus::Pending, Some(Uuid::new_v4()), false);
    assert_eq!(
        plan_settlement(&d, &verdict(PaymentOutcome::Failed), 100),
        SettlementPlan::MarkFailed
    );
    assert_eq!(
        plan_settlement(&d, &verdict(PaymentOutcome::Cancelled), 100),
        SettlementPlan::MarkCancelled
    );
}

#[test]
fn point_rate_comes_from_configuration() {
    let d = donation(DonationStatus::Pending, Some(Uuid::new_v4()), false);
    let plan = plan_settlement(&d, &verdict(PaymentOutcome::Success), 500);
    assert_eq!(
        plan,
        SettlementPlan::Credit {
            loyalty_points: Some(5)
        }
    );
}
