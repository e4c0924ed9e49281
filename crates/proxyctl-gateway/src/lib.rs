//! proxyctl gateway library entry.
//!
//! Wires the allowlist guard, command gateway, secret reader and metrics into
//! an axum service. Consumed by the binary (`main.rs`) and integration tests.

pub mod app_state;
pub mod command;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod response;
pub mod router;
pub mod secret;
