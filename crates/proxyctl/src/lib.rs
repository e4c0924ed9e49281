//! Top-level facade crate for proxyctl.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use proxyctl_core::*;
}

pub mod gateway {
    pub use proxyctl_gateway::*;
}
