//! Tabshell — a desktop browser shell built around a single-writer profile
//! state machine, replicated to chrome windows via diffs.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod services;
pub mod state;
pub mod types;
