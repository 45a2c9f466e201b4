use donation_gateway::error::GatewayError;
use donation_gateway::gateways::mock::MockGateway;
use donation_gateway::gateways::{DonationGateway, PaymentOutcome, SessionRequest};
use uuid::Uuid;

fn session_request() -> SessionRequest {
    SessionRequest {
        donation_id: Uuid::new_v4(),
        amount: 1_000,
        currency: "BDT".to_string(),
        customer_name: "Test Donor".to_string(),
        customer_email: "donor@example.com".to_string(),
        customer_phone: "01700000000".to_string(),
    }
}

#[tokio::test]
async fn mock_session_carries_the_donation_id() {
    let gateway = MockGateway {
        behavior: "ALWAYS_SUCCESS".to_string(),
    };
    let request = session_request();
    let donation_id = request.donation_id;

    let session = gateway.create_session(request).await.unwrap();
    assert!(session.payment_url.contains(&donation_id.to_string()));
    assert!(session.provider_payment_ref.is_some());
}

#[tokio::test]
async fn mock_behaviors_map_to_outcomes() {
    for (behavior, expected) in [
        ("ALWAYS_SUCCESS", PaymentOutcome::Success),
        ("ALWAYS_FAILURE", PaymentOutcome::Failed),
        ("ALWAYS_CANCEL", PaymentOutcome::Cancelled),
        ("ALWAYS_PENDING", PaymentOutcome::Pending),
    ] {
        let gateway = MockGateway {
            behavior: behavior.to_string(),
        };
        let verdict = gateway.verify_payment("ref").await.unwrap();
        assert_eq!(verdict.outcome, expected, "behavior {behavior}");
    }
}

#[tokio::test]
async fn mock_outage_is_a_verification_error_not_a_failure() {
    let gateway = MockGateway {
        behavior: "ALWAYS_UNREACHABLE".to_string(),
    };
    let err = gateway.verify_payment("ref").await.unwrap_err();
    assert!(matches!(err, GatewayError::Verification { .. }));
}
