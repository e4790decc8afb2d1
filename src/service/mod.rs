//! Request-level flows: each function is one unit of work against the
//! injected repositories.

pub mod attendance;
pub mod holiday;
pub mod leave;
pub mod overtime;
