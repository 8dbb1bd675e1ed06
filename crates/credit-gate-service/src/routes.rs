//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, credits, features, gate, health, usage};
use crate::state::AppState;

/// Maximum concurrent requests for the gate endpoint.
/// Every metered feature call funnels through it, so it gets the
/// highest limit while still being protected from overload.
const GATE_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts (principal JWT)
/// - `POST /v1/accounts` - Register the principal's account
/// - `GET /v1/accounts/me` - Get the principal's account
///
/// ## Credits
/// - `GET /v1/credits/balance` - Principal's balance
/// - `GET /v1/credits/grants` - Principal's grant history
/// - `POST /v1/credits/grant` - Admin: add credits to an account
///
/// ## Gate (concurrency-limited separately)
/// - `POST /v1/gate/authorize` - Authorize a feature invocation
///
/// ## Features (admin)
/// - `GET /v1/features` - List feature costs
/// - `PUT /v1/features/:feature_id` - Upsert a feature cost
/// - `GET /v1/features/:feature_id` - Get a feature cost
///
/// ## Usage
/// - `GET /v1/usage` - Admin: usage statistics for any account
/// - `GET /v1/usage/me` - Principal's own usage history
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // The gate carries the hot path, so it gets its own concurrency limit.
    let gate_routes = Router::new()
        .route("/authorize", post(gate::authorize))
        .layer(ConcurrencyLimitLayer::new(GATE_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Accounts
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/me", get(accounts::get_account))
        // Credits
        .route("/credits/balance", get(credits::get_balance))
        .route("/credits/grants", get(credits::list_grants))
        .route("/credits/grant", post(credits::grant_credits))
        // Features
        .route("/features", get(features::list_features))
        .route("/features/:feature_id", put(features::upsert_feature))
        .route("/features/:feature_id", get(features::get_feature))
        // Usage
        .route("/usage", get(usage::list_usage))
        .route("/usage/me", get(usage::my_usage))
        // Gate (with its own concurrency limit)
        .nest("/gate", gate_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no limit)
        .route("/health", get(health::health))
        // API v1 routes
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
