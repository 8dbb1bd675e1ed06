//! HTTP request handlers.

pub mod accounts;
pub mod credits;
pub mod features;
pub mod gate;
pub mod health;
pub mod usage;
