//! Policy layer (caller allowlist).
//!
//! The allowlist is loaded fresh per request and consumed by the access guard
//! middleware, which sits in front of every route.

pub mod allowlist;
pub mod guard;

pub use allowlist::Allowlist;
pub use guard::{access_guard, caller_address};
