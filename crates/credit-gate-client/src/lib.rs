//! Credit-Gate Client SDK.
//!
//! This crate provides a client library for feature surfaces to interact
//! with the credit-gate API.
//!
//! # Example
//!
//! ```no_run
//! use credit_gate_client::CreditGateClient;
//! use credit_gate_core::Decision;
//!
//! # async fn example(user_token: &str) -> Result<(), credit_gate_client::ClientError> {
//! let client = CreditGateClient::new("http://credit-gate.platform.svc:8080");
//!
//! // Gate a metered feature before doing the work.
//! match client.authorize(user_token, "copywriting.generate").await? {
//!     Decision::Allowed { new_balance, .. } => {
//!         println!("debited; {new_balance} credits left");
//!     }
//!     Decision::AllowedFree => println!("feature is free right now"),
//!     Decision::Denied { required, available } => {
//!         println!("needs {required} credits, only {available} available");
//!     }
//!     Decision::Forbidden | Decision::NotFound { .. } => println!("rejected"),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CreditGateClient};
pub use error::ClientError;
pub use types::*;
