//! Event types exchanged with the host.
//!
//! Submodules:
//! - [`actuator`] – fan-out actuator requests emitted on cycle completion
pub mod actuator;
