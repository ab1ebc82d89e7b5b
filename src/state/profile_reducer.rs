//! Pure transition function for the process-wide profile state.

use crate::state::actions::ProfileAction;
use crate::types::profile::{LocationMeta, ProfileState, RECENT_BOOKMARKS_CAP};

/// Applies one action to the profile state, returning the next state.
pub fn reduce(state: &ProfileState, action: &ProfileAction) -> ProfileState {
    let mut next = state.clone();
    match action {
        ProfileAction::Bookmark { url } => {
            next.bookmarks.insert(url.clone());
            push_recent(&mut next.recent_bookmarks, url);
        }
        ProfileAction::Unbookmark { url } => {
            next.bookmarks.remove(url);
            next.recent_bookmarks.retain(|recent| recent != url);
        }
        ProfileAction::AddWindow { window_id } => {
            next.open_windows.insert(window_id.clone());
        }
        ProfileAction::CloseWindow { window_id } => {
            next.open_windows.remove(window_id);
        }
        ProfileAction::RecordLocation {
            url,
            title,
            visited_at,
        } => {
            let meta = next.locations.entry(url.clone()).or_insert_with(LocationMeta::default);
            meta.visit_count += 1;
            meta.last_visited = *visited_at;
            if title.is_some() {
                meta.title = title.clone();
            }
        }
        ProfileAction::SeedBookmarks { bookmarks, recent } => {
            next.bookmarks = bookmarks.iter().cloned().collect();
            next.recent_bookmarks = recent.clone();
            next.recent_bookmarks.truncate(RECENT_BOOKMARKS_CAP);
        }
        ProfileAction::SeedLocations { locations } => {
            next.locations = locations.iter().cloned().collect();
        }
    }
    next
}

/// Moves `url` to the front of the recent list, deduplicating and capping.
fn push_recent(recent: &mut Vec<String>, url: &str) {
    recent.retain(|entry| entry != url);
    recent.insert(0, url.to_string());
    recent.truncate(RECENT_BOOKMARKS_CAP);
}
