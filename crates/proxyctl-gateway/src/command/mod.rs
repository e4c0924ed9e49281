//! Command gateway: operation table, process execution, outcome shaping.

pub mod executor;
pub mod gateway;

pub use executor::{CommandExecutor, CommandOutput, Invocation, SystemExecutor};
pub use gateway::{shape_response, CommandGateway};
