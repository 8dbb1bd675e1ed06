//! Account registration handlers.
//!
//! Account lifecycle is driven externally: the signup flow calls
//! `POST /v1/accounts` with the principal's token once the identity provider
//! has created the user.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use credit_gate_core::Account;
use credit_gate_store::Store;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// Account response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// The account ID.
    pub account_id: String,
    /// Current balance.
    pub balance: i64,
    /// Role.
    pub role: String,
    /// Lifetime credits granted.
    pub lifetime_granted: i64,
    /// Lifetime credits debited.
    pub lifetime_debited: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            balance: account.balance,
            role: format!("{:?}", account.role).to_lowercase(),
            lifetime_granted: account.lifetime_granted,
            lifetime_debited: account.lifetime_debited,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Register an account for the authenticated principal.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = Account::new(principal.account_id, principal.role);
    // Existence check and insert are one store transaction; a concurrent
    // duplicate registration loses cleanly instead of overwriting.
    state.store.create_account(&account)?;

    tracing::info!(account_id = %account.account_id, "Account registered");

    Ok(Json(AccountResponse::from(&account)))
}

/// Get the authenticated principal's account.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .store
        .get_account(&principal.account_id)?
        .ok_or_else(|| ApiError::NotFound("account not found".into()))?;

    Ok(Json(AccountResponse::from(&account)))
}
