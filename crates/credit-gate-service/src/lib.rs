//! Credit-Gate HTTP API Service.
//!
//! This crate provides the HTTP API for the credit-gate subsystem:
//!
//! - Account registration and balance queries
//! - The gate endpoint metered features call before doing billable work
//! - Admin operations: feature costs, credit grants, usage statistics
//!
//! # Authentication
//!
//! All non-public endpoints expect an HS256 JWT minted by the identity
//! provider; the token's `sub` and `role` claims resolve the principal.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Axum handlers all return Result; documenting each error is noise.
#![allow(clippy::missing_errors_doc)]

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{Claims, OptionalPrincipal, Principal};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use guard::AccessGuard;
pub use routes::create_router;
pub use state::AppState;
