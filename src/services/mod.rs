//! Collaborators around the profile state machine: diffing, replication,
//! command handling and remote star sync.

pub mod command_handler;
pub mod diff_engine;
pub mod replication;
pub mod star_sync;
