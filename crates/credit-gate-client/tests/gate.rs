//! Client tests against a mocked credit-gate service.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use credit_gate_client::{ClientError, CreditGateClient};
use credit_gate_core::Decision;

async fn mock_client() -> (MockServer, CreditGateClient) {
    let server = MockServer::start().await;
    let client = CreditGateClient::new(server.uri());
    (server, client)
}

#[tokio::test]
async fn authorize_parses_allowed_decision() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/v1/gate/authorize"))
        .and(header("authorization", "Bearer user-token"))
        .and(body_json(json!({ "feature_id": "copywriting.generate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "decision": "allowed",
            "cost": 30,
            "new_balance": 70,
            "record_id": "01J00000000000000000000000"
        })))
        .mount(&server)
        .await;

    let decision = client
        .authorize("user-token", "copywriting.generate")
        .await
        .unwrap();

    assert!(decision.is_allowed());
    match decision {
        Decision::Allowed {
            cost, new_balance, ..
        } => {
            assert_eq!(cost, 30);
            assert_eq!(new_balance, 70);
        }
        other => panic!("expected Allowed, got {other:?}"),
    }
}

#[tokio::test]
async fn authorize_parses_denied_decision_from_402() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/v1/gate/authorize"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "decision": "denied",
            "required": 80,
            "available": 70
        })))
        .mount(&server)
        .await;

    let decision = client.authorize("user-token", "export.video").await.unwrap();

    assert_eq!(
        decision,
        Decision::Denied {
            required: 80,
            available: 70
        }
    );
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn authorize_parses_forbidden_and_not_found_decisions() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/v1/gate/authorize"))
        .and(body_json(json!({ "feature_id": "copywriting.generate" })))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "decision": "forbidden" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/gate/authorize"))
        .and(body_json(json!({ "feature_id": "never.registered" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "decision": "not_found",
            "feature_id": "never.registered"
        })))
        .mount(&server)
        .await;

    let decision = client
        .authorize("stale-token", "copywriting.generate")
        .await
        .unwrap();
    assert_eq!(decision, Decision::Forbidden);

    let decision = client
        .authorize("user-token", "never.registered")
        .await
        .unwrap();
    match decision {
        Decision::NotFound { feature_id } => {
            assert_eq!(feature_id.as_str(), "never.registered");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn authorize_surfaces_non_decision_errors() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/v1/gate/authorize"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "not_found", "message": "account not found" }
        })))
        .mount(&server)
        .await;

    let err = client
        .authorize("user-token", "copywriting.generate")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn balance_and_grant_round_trip() {
    let (server, client) = mock_client().await;
    let account_id = "6dfd4b4e-3f21-4b58-9ab3-2f3a41c0e9d2";

    Mock::given(method("GET"))
        .and(path("/v1/credits/balance"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": account_id,
            "balance": 205
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/credits/grant"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({
            "account_id": account_id,
            "amount": 200,
            "reason": "promo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": account_id,
            "amount": 200,
            "new_balance": 205,
            "record_id": "01J00000000000000000000001"
        })))
        .mount(&server)
        .await;

    let grant = client
        .grant("admin-token", account_id, 200, "promo")
        .await
        .unwrap();
    assert_eq!(grant.new_balance, 205);

    let balance = client.get_balance("user-token").await.unwrap();
    assert_eq!(balance.balance, 205);
    assert_eq!(balance.account_id, account_id);
}

#[tokio::test]
async fn grant_without_admin_role_is_forbidden() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/v1/credits/grant"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": "forbidden", "message": "admin role required" }
        })))
        .mount(&server)
        .await;

    let err = client
        .grant("user-token", "some-account", 50, "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
}

#[tokio::test]
async fn feature_listing_round_trip() {
    let (server, client) = mock_client().await;

    Mock::given(method("PUT"))
        .and(path("/v1/features/copywriting.generate"))
        .and(body_json(json!({ "cost": 30, "active": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feature_id": "copywriting.generate",
            "cost": 30,
            "active": true,
            "updated_at": "2026-01-15T10:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/features"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{
                "feature_id": "copywriting.generate",
                "cost": 30,
                "active": true,
                "updated_at": "2026-01-15T10:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    let entry = client
        .upsert_feature("admin-token", "copywriting.generate", 30, true)
        .await
        .unwrap();
    assert_eq!(entry.cost, 30);

    let features = client.list_features("admin-token").await.unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].feature_id, "copywriting.generate");
}

#[tokio::test]
async fn usage_listing_round_trip() {
    let (server, client) = mock_client().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "id": "01J00000000000000000000002",
                "account_id": "6dfd4b4e-3f21-4b58-9ab3-2f3a41c0e9d2",
                "feature_id": "copywriting.generate",
                "amount": 30,
                "recorded_at": "2026-01-15T10:00:00Z"
            }],
            "summary": { "count": 1, "total_debited": 30 }
        })))
        .mount(&server)
        .await;

    let usage = client.my_usage("user-token").await.unwrap();
    assert_eq!(usage.records.len(), 1);
    assert_eq!(usage.summary.total_debited, 30);
}
