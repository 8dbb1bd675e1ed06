//! Credit-gate HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use credit_gate_core::Decision;

use crate::error::ClientError;
use crate::types::{
    AccountResponse, ApiErrorResponse, AuthorizeRequest, BalanceResponse, FeatureResponse,
    GrantCreditsRequest, GrantCreditsResponse, ListFeaturesResponse, ListUsageResponse,
    UpsertFeatureRequest,
};

/// Credit-gate API client.
///
/// Feature surfaces use [`authorize`](CreditGateClient::authorize) before
/// doing billable work; the remaining methods cover account, balance, and
/// admin operations. Tokens are passed per call so one client can serve
/// many principals.
#[derive(Debug, Clone)]
pub struct CreditGateClient {
    client: Client,
    base_url: String,
}

impl CreditGateClient {
    /// Create a new credit-gate client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the credit-gate service (e.g., `"http://credit-gate:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new credit-gate client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Authorize one invocation of a metered feature.
    ///
    /// Returns the service's [`Decision`] for denied, forbidden, and unknown
    /// features as well as for allowed ones; callers branch on the variant
    /// rather than on errors. A successful `Allowed` decision means the debit
    /// was already committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error
    /// outside the decision protocol.
    pub async fn authorize(
        &self,
        token: &str,
        feature_id: impl Into<String>,
    ) -> Result<Decision, ClientError> {
        let url = format!("{}/v1/gate/authorize", self.base_url);
        let request = AuthorizeRequest {
            feature_id: feature_id.into(),
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {token}"))
            .json(&request)
            .send()
            .await?;

        // Denied, forbidden, and not-found decisions ride on 402/403/404, so
        // try the decision body before falling back to the error envelope.
        let status = response.status();
        let body = response.bytes().await?;

        if let Ok(decision) = serde_json::from_slice::<Decision>(&body) {
            tracing::debug!(?status, allowed = decision.is_allowed(), "Gate decision");
            return Ok(decision);
        }

        Err(Self::error_from_body(status, &body))
    }

    /// Register the token's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_account(&self, token: &str) -> Result<AccountResponse, ClientError> {
        let url = format!("{}/v1/accounts", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Get the token's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_account(&self, token: &str) -> Result<AccountResponse, ClientError> {
        let url = format!("{}/v1/accounts/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Get the token's current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_balance(&self, token: &str) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/v1/credits/balance", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Admin: add credits to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn grant(
        &self,
        admin_token: &str,
        account_id: impl Into<String>,
        amount: i64,
        reason: impl Into<String>,
    ) -> Result<GrantCreditsResponse, ClientError> {
        let url = format!("{}/v1/credits/grant", self.base_url);
        let request = GrantCreditsRequest {
            account_id: account_id.into(),
            amount,
            reason: reason.into(),
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {admin_token}"))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Admin: create or update a feature cost entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn upsert_feature(
        &self,
        admin_token: &str,
        feature_id: &str,
        cost: i64,
        active: bool,
    ) -> Result<FeatureResponse, ClientError> {
        let url = format!("{}/v1/features/{feature_id}", self.base_url);
        let request = UpsertFeatureRequest { cost, active };

        let response = self
            .client
            .put(&url)
            .header("authorization", format!("Bearer {admin_token}"))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Admin: list all feature cost entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_features(
        &self,
        admin_token: &str,
    ) -> Result<Vec<FeatureResponse>, ClientError> {
        let url = format!("{}/v1/features", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {admin_token}"))
            .send()
            .await?;

        let listing: ListFeaturesResponse = Self::handle_response(response).await?;
        Ok(listing.features)
    }

    /// Get the token's own usage history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn my_usage(&self, token: &str) -> Result<ListUsageResponse, ClientError> {
        let url = format!("{}/v1/usage/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.bytes().await?;
        Err(Self::error_from_body(status, &body))
    }

    /// Map an error envelope to a typed client error.
    fn error_from_body(status: reqwest::StatusCode, body: &[u8]) -> ClientError {
        match serde_json::from_slice::<ApiErrorResponse>(body) {
            Ok(api_error) => {
                let code = api_error.error.code;
                let message = api_error.error.message;

                match code.as_str() {
                    "not_found" => ClientError::NotFound(message),
                    "forbidden" => ClientError::Forbidden(message),
                    "store_unavailable" => ClientError::Unavailable(message),
                    _ => ClientError::Api {
                        code,
                        message,
                        status: status.as_u16(),
                    },
                }
            }
            Err(_) => ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            },
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CreditGateClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn error_envelope_maps_to_typed_errors() {
        let body = br#"{"error":{"code":"not_found","message":"account not found"}}"#;
        let err = CreditGateClient::error_from_body(reqwest::StatusCode::NOT_FOUND, body);
        assert!(matches!(err, ClientError::NotFound(_)));

        let body = br#"{"error":{"code":"weird","message":"what"}}"#;
        let err = CreditGateClient::error_from_body(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ClientError::Api { status: 400, .. }));

        let err =
            CreditGateClient::error_from_body(reqwest::StatusCode::INTERNAL_SERVER_ERROR, b"oops");
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }
}
