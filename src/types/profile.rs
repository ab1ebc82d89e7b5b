use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Maximum length of the most-recent-first bookmark list.
pub const RECENT_BOOKMARKS_CAP: usize = 5;

/// Process-wide browsing state shared by all windows.
///
/// Owned exclusively by the main process; windows receive read-only projections
/// via diffs or a snapshot on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileState {
    pub bookmarks: BTreeSet<String>,
    /// Most-recent-first, capped at [`RECENT_BOOKMARKS_CAP`].
    pub recent_bookmarks: Vec<String>,
    pub open_windows: BTreeSet<String>,
    /// Autocomplete history, keyed by location.
    pub locations: BTreeMap<String, LocationMeta>,
}

/// Completion metadata for one visited location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationMeta {
    pub title: Option<String>,
    pub visit_count: u32,
    pub last_visited: i64,
}

/// Snapshot returned synchronously to a window on its ready signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPayload {
    pub bookmarks: Vec<String>,
    pub recent_bookmarks: Vec<String>,
}

impl ProfileState {
    /// Builds the window bootstrap snapshot from the current state.
    pub fn bootstrap(&self) -> BootstrapPayload {
        BootstrapPayload {
            bookmarks: self.bookmarks.iter().cloned().collect(),
            recent_bookmarks: self.recent_bookmarks.clone(),
        }
    }
}
