//! Structural diffing of consecutive profile snapshots.
//!
//! The engine holds the last snapshot it observed and compares each field by
//! structural equality, emitting one targeted event per changed field. It is
//! driven from store-subscription callbacks, so mutations that land between
//! two observations coalesce into a single diff against the latest state —
//! replication is at-most-once per change detected, not per dispatch.

use serde_json::{json, Value};

use crate::types::profile::ProfileState;

/// Replication channel event name for normalized profile data diffs.
pub const PROFILE_DIFF_EVENT: &str = "profile-diff";

/// A targeted notification produced by one snapshot comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicationEvent {
    /// A window id newly present in the window set: make it visible once it
    /// finishes loading.
    ShowWindow { window_id: String },
    /// A window id newly absent from the window set: close it once it
    /// finishes loading.
    CloseWindow { window_id: String },
    /// The recent-bookmarks list changed; chrome menus must be rebuilt.
    RebuildMenu { recent_bookmarks: Vec<String> },
    /// A data field changed; the normalized projection goes to every window.
    ProfileDiff { payload: Value },
}

/// Compares consecutive [`ProfileState`] snapshots field by field.
pub struct DiffEngine {
    previous: ProfileState,
}

impl DiffEngine {
    pub fn new(initial: &ProfileState) -> Self {
        Self {
            previous: initial.clone(),
        }
    }

    /// Diffs `next` against the previously observed snapshot and returns the
    /// events to replicate, then adopts `next` as the new baseline.
    ///
    /// Windows are diffed by identity (window id), not position, so concurrent
    /// creation and destruction in one step produce the right events.
    pub fn observe(&mut self, next: &ProfileState) -> Vec<ReplicationEvent> {
        let mut events = Vec::new();

        if self.previous.open_windows != next.open_windows {
            for window_id in next.open_windows.difference(&self.previous.open_windows) {
                events.push(ReplicationEvent::ShowWindow {
                    window_id: window_id.clone(),
                });
            }
            for window_id in self.previous.open_windows.difference(&next.open_windows) {
                events.push(ReplicationEvent::CloseWindow {
                    window_id: window_id.clone(),
                });
            }
        }

        if self.previous.recent_bookmarks != next.recent_bookmarks {
            events.push(ReplicationEvent::RebuildMenu {
                recent_bookmarks: next.recent_bookmarks.clone(),
            });
        }

        if self.previous.bookmarks != next.bookmarks {
            events.push(ReplicationEvent::ProfileDiff {
                payload: json!({
                    "bookmarks": next.bookmarks.iter().collect::<Vec<_>>(),
                }),
            });
        }

        if self.previous.locations != next.locations {
            events.push(ReplicationEvent::ProfileDiff {
                payload: json!({
                    "locations": next.locations,
                }),
            });
        }

        self.previous = next.clone();
        events
    }

    /// The snapshot the next observation will diff against.
    pub fn baseline(&self) -> &ProfileState {
        &self.previous
    }
}
