//! Reducers, actions and the state container.

pub mod actions;
pub mod profile_reducer;
pub mod store;
pub mod tab_reducer;
