//! proxyctl core: transport-agnostic error types and the response envelope.
//!
//! This crate defines the wire-level contract and error surface shared by the
//! gateway and its tests. It carries no runtime or HTTP dependencies.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here; every fallible path
//! surfaces as `ProxyCtlError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod envelope;
pub mod error;

pub use envelope::OperationResult;
/// Shared result type.
pub use error::{ClientCode, ProxyCtlError, Result};
