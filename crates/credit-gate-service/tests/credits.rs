//! Credit grant and balance integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use credit_gate_core::AccountId;
use serde_json::json;

#[tokio::test]
async fn grant_adds_credits_without_recording_usage() {
    let harness = TestHarness::new();
    harness.create_user_account().await;
    harness.grant_user(5, "trial").await;

    // A promo grant on top of the trial balance.
    let response = harness
        .server
        .post("/v1/credits/grant")
        .add_header("authorization", harness.admin_auth_header())
        .json(&json!({
            "account_id": harness.user_id.to_string(),
            "amount": 200,
            "reason": "promo"
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["amount"], 200);
    assert_eq!(body["new_balance"], 205);
    assert!(body["record_id"].as_str().is_some());

    assert_eq!(harness.user_balance().await, 205);

    // Grants are ledger entries, not usage.
    let usage = harness.user_usage().await;
    assert!(usage["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn grant_history_is_newest_first() {
    let harness = TestHarness::new();
    harness.create_user_account().await;
    harness.grant_user(10, "first").await;
    harness.grant_user(20, "second").await;

    let response = harness
        .server
        .get("/v1/credits/grants")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let grants = body["grants"].as_array().unwrap();
    assert_eq!(grants.len(), 2);
    assert_eq!(grants[0]["reason"], "second");
    assert_eq!(grants[0]["amount"], 20);
    assert_eq!(grants[1]["reason"], "first");
}

#[tokio::test]
async fn grant_requires_admin_role() {
    let harness = TestHarness::new();
    harness.create_user_account().await;

    let response = harness
        .server
        .post("/v1/credits/grant")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "account_id": harness.user_id.to_string(),
            "amount": 50,
            "reason": "self-serve"
        }))
        .await;
    response.assert_status_forbidden();

    assert_eq!(harness.user_balance().await, 0);
}

#[tokio::test]
async fn grant_to_unknown_account_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/credits/grant")
        .add_header("authorization", harness.admin_auth_header())
        .json(&json!({
            "account_id": AccountId::generate().to_string(),
            "amount": 50,
            "reason": "promo"
        }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn grant_rejects_non_positive_amounts() {
    let harness = TestHarness::new();
    harness.create_user_account().await;

    for amount in [0, -25] {
        let response = harness
            .server
            .post("/v1/credits/grant")
            .add_header("authorization", harness.admin_auth_header())
            .json(&json!({
                "account_id": harness.user_id.to_string(),
                "amount": amount,
                "reason": "bogus"
            }))
            .await;
        response.assert_status_bad_request();
    }

    assert_eq!(harness.user_balance().await, 0);
}

#[tokio::test]
async fn grant_rejects_malformed_account_id() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/credits/grant")
        .add_header("authorization", harness.admin_auth_header())
        .json(&json!({
            "account_id": "not-a-uuid",
            "amount": 50,
            "reason": "promo"
        }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn grant_rejects_unknown_fields() {
    let harness = TestHarness::new();
    harness.create_user_account().await;

    let response = harness
        .server
        .post("/v1/credits/grant")
        .add_header("authorization", harness.admin_auth_header())
        .json(&json!({
            "account_id": harness.user_id.to_string(),
            "amount": 50,
            "reason": "promo",
            "extra": 1
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn balance_requires_registration_and_token() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/v1/credits/balance")
        .await
        .assert_status_unauthorized();

    harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_not_found();
}
