use donation_gateway::gateways::bkash::{interpret_execute, BkashExecuteResponse};
use donation_gateway::gateways::shurjopay::interpret_verification;
use donation_gateway::gateways::sslcommerz::{interpret_validation, SslValidationResponse};
use donation_gateway::gateways::PaymentOutcome;
use serde_json::json;

fn bkash_response(
    status_code: Option<&str>,
    transaction_status: Option<&str>,
) -> BkashExecuteResponse {
    BkashExecuteResponse {
        status_code: status_code.map(ToString::to_string),
        transaction_status: transaction_status.map(ToString::to_string),
        trx_id: Some("9BC1A2B3C4".to_string()),
        amount: Some("2500".to_string()),
    }
}

#[test]
fn bkash_completed_is_success() {
    let verdict = interpret_execute(&bkash_response(Some("0000"), Some("Completed"))).unwrap();
    assert_eq!(verdict.outcome, PaymentOutcome::Success);
    assert_eq!(verdict.provider_transaction_id.as_deref(), Some("9BC1A2B3C4"));
    assert_eq!(verdict.amount, Some(2500.0));
}

#[test]
fn bkash_initiated_is_pending() {
    let verdict = interpret_execute(&bkash_response(Some("0000"), Some("Initiated"))).unwrap();
    assert_eq!(verdict.outcome, PaymentOutcome::Pending);
}

#[test]
fn bkash_error_codes_are_failures() {
    // 2023: insufficient balance; 2029: duplicate invoice
    for code in ["2023", "2029", "2062"] {
        let verdict = interpret_execute(&bkash_response(Some(code), None)).unwrap();
        assert_eq!(verdict.outcome, PaymentOutcome::Failed);
    }
}

#[test]
fn bkash_missing_status_code_is_indeterminate() {
    assert!(interpret_execute(&bkash_response(None, Some("Completed"))).is_err());
}

fn ssl_response(status: Option<&str>) -> SslValidationResponse {
    SslValidationResponse {
        status: status.map(ToString::to_string),
        tran_id: Some("c0ffee00-0000-0000-0000-000000000000".to_string()),
        amount: Some("2500.00".to_string()),
        bank_tran_id: Some("BANKTRX42".to_string()),
    }
}

#[test]
fn sslcommerz_valid_and_validated_are_success() {
    for status in ["VALID", "VALIDATED"] {
        let verdict = interpret_validation(&ssl_response(Some(status))).unwrap();
        assert_eq!(verdict.outcome, PaymentOutcome::Success);
        assert_eq!(verdict.provider_transaction_id.as_deref(), Some("BANKTRX42"));
        assert_eq!(verdict.amount, Some(2500.0));
    }
}

#[test]
fn sslcommerz_anything_else_is_failure() {
    for status in ["INVALID_TRANSACTION", "FAILED", "CANCELLED"] {
        let verdict = interpret_validation(&ssl_response(Some(status))).unwrap();
        assert_eq!(verdict.outcome, PaymentOutcome::Failed);
    }
}

#[test]
fn sslcommerz_missing_status_is_indeterminate() {
    assert!(interpret_validation(&ssl_response(None)).is_err());
}

#[test]
fn shurjopay_1000_is_success() {
    let verdict = interpret_verification(&json!({
        "sp_code": 1000,
        "bank_trx_id": "SPTRX99",
        "amount": 2500,
    }))
    .unwrap();
    assert_eq!(verdict.outcome, PaymentOutcome::Success);
    assert_eq!(verdict.provider_transaction_id.as_deref(), Some("SPTRX99"));
    assert_eq!(verdict.amount, Some(2500.0));
}

#[test]
fn shurjopay_string_codes_are_accepted() {
    let verdict = interpret_verification(&json!({"sp_code": "1000", "amount": "2500"})).unwrap();
    assert_eq!(verdict.outcome, PaymentOutcome::Success);
    assert_eq!(verdict.amount, Some(2500.0));
}

#[test]
fn shurjopay_1002_is_cancelled() {
    let verdict = interpret_verification(&json!({"sp_code": "1002"})).unwrap();
    assert_eq!(verdict.outcome, PaymentOutcome::Cancelled);
}

#[test]
fn shurjopay_other_codes_are_failures() {
    for code in ["1001", "1011", "1065"] {
        let verdict = interpret_verification(&json!({ "sp_code": code })).unwrap();
        assert_eq!(verdict.outcome, PaymentOutcome::Failed);
    }
}

#[test]
fn shurjopay_missing_code_is_indeterminate() {
    assert!(interpret_verification(&json!({"order_id": "sp123"})).is_err());
}
