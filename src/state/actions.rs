//! Typed action vocabulary consumed by the reducers.
//!
//! Each variant carries its full payload; there is no dynamic action object.

use serde::{Deserialize, Serialize};

use crate::types::page::{Page, PageDetails};

/// Commands dispatched into the per-window tab reducer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TabAction {
    /// Append a new tab and select it. `None` opens the default home location.
    CreateTab { location: Option<String> },
    /// Append a new tab at the location of the page at `page_index` and select it.
    DuplicateTab { page_index: usize },
    /// Replace the whole window state with a single-page state seeded from `page`.
    /// Used when a tab detaches into a new window.
    AttachTab { page: Page },
    /// Close the tab at `page_index`; closing the last tab resets to the
    /// initial single-home-page state.
    CloseTab { page_index: usize },
    /// Set the pending address-bar text on the currently selected page.
    SetLocation { user_typed: String },
    /// Apply a batch of field updates to one page. `None` means "current page".
    SetPageDetails {
        page_index: Option<usize>,
        details: PageDetails,
    },
    /// Change the selected tab.
    SetCurrentTab { page_index: usize },
    /// Replace the display order wholesale. Must be a permutation of page indices.
    SetPageOrder { order: Vec<usize> },
}

/// Commands dispatched into the process-wide profile reducer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProfileAction {
    Bookmark { url: String },
    Unbookmark { url: String },
    AddWindow { window_id: String },
    CloseWindow { window_id: String },
    /// Upsert autocomplete metadata for a visited location.
    RecordLocation {
        url: String,
        title: Option<String>,
        visited_at: i64,
    },
    /// Startup seed from durable storage.
    SeedBookmarks {
        bookmarks: Vec<String>,
        recent: Vec<String>,
    },
    /// Startup seed of the autocomplete history.
    SeedLocations {
        locations: Vec<(String, crate::types::profile::LocationMeta)>,
    },
}
