//! Account endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;

#[tokio::test]
async fn create_account_then_fetch_it() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/accounts")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["account_id"], harness.user_id.to_string());
    assert_eq!(body["balance"], 0);
    assert_eq!(body["role"], "user");
    assert_eq!(body["lifetime_granted"], 0);
    assert_eq!(body["lifetime_debited"], 0);

    let response = harness
        .server
        .get("/v1/accounts/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["account_id"], harness.user_id.to_string());
    assert_eq!(body["balance"], 0);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let harness = TestHarness::new();
    harness.create_user_account().await;

    let response = harness
        .server
        .post("/v1/accounts")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn unregistered_account_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/accounts/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn account_endpoints_require_a_token() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/v1/accounts")
        .await
        .assert_status_unauthorized();
    harness
        .server
        .get("/v1/accounts/me")
        .await
        .assert_status_unauthorized();
}
