//! Common test utilities for credit-gate integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use tempfile::TempDir;

use credit_gate_core::{AccountId, Role};
use credit_gate_service::{create_router, AppState, Claims, ServiceConfig};
use credit_gate_store::RocksStore;

/// Shared HS256 secret for test tokens.
pub const TEST_AUTH_SECRET: &str = "test-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user account for authenticated requests.
    pub user_id: AccountId,
    /// A test admin account.
    pub admin_id: AccountId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_secret: TEST_AUTH_SECRET.into(),
            auth_audience: "credit-gate".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            user_id: AccountId::generate(),
            admin_id: AccountId::generate(),
        }
    }

    /// Mint a bearer token for an arbitrary principal.
    pub fn token_for(account_id: AccountId, role: Role) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            role,
            aud: "credit-gate".into(),
            exp: now + 3600,
            iat: now,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_AUTH_SECRET.as_bytes()),
        )
        .expect("Failed to mint token");
        format!("Bearer {token}")
    }

    /// Authorization header value for the test user.
    pub fn user_auth_header(&self) -> String {
        Self::token_for(self.user_id, Role::User)
    }

    /// Authorization header value for the test admin.
    pub fn admin_auth_header(&self) -> String {
        Self::token_for(self.admin_id, Role::Admin)
    }

    /// Register the test user's account.
    pub async fn create_user_account(&self) {
        self.server
            .post("/v1/accounts")
            .add_header("authorization", self.user_auth_header())
            .await
            .assert_status_ok();
    }

    /// Admin: grant credits to the test user.
    pub async fn grant_user(&self, amount: i64, reason: &str) {
        self.server
            .post("/v1/credits/grant")
            .add_header("authorization", self.admin_auth_header())
            .json(&json!({
                "account_id": self.user_id.to_string(),
                "amount": amount,
                "reason": reason
            }))
            .await
            .assert_status_ok();
    }

    /// Admin: register a feature cost.
    pub async fn upsert_feature(&self, feature_id: &str, cost: i64, active: bool) {
        self.server
            .put(&format!("/v1/features/{feature_id}"))
            .add_header("authorization", self.admin_auth_header())
            .json(&json!({ "cost": cost, "active": active }))
            .await
            .assert_status_ok();
    }

    /// The test user's current balance.
    pub async fn user_balance(&self) -> i64 {
        let response = self
            .server
            .get("/v1/credits/balance")
            .add_header("authorization", self.user_auth_header())
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["balance"].as_i64().unwrap()
    }

    /// The test user's usage records.
    pub async fn user_usage(&self) -> serde_json::Value {
        let response = self
            .server
            .get("/v1/usage/me")
            .add_header("authorization", self.user_auth_header())
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
