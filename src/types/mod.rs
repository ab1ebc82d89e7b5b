//! Shared value types for tabshell.

pub mod errors;
pub mod page;
pub mod profile;
pub mod session;
pub mod tab_state;
