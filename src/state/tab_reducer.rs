//! Pure transition function for one window's tab state.
//!
//! Every transition returns a new `TabState`; the input is never mutated.
//! Malformed input (an out-of-range index, a non-permutation order) is a
//! silent no-op rather than an error — reducers never fail.

use crate::state::actions::TabAction;
use crate::types::page::Page;
use crate::types::tab_state::TabState;

/// Applies one action to the tab state, returning the next state.
pub fn reduce(state: &TabState, action: &TabAction) -> TabState {
    match action {
        TabAction::CreateTab { location } => {
            let location = location.as_deref().unwrap_or(crate::types::page::DEFAULT_LOCATION);
            append_page(state, Page::new(location))
        }
        TabAction::DuplicateTab { page_index } => match state.pages.get(*page_index) {
            Some(source) => append_page(state, Page::new(&source.location)),
            None => state.clone(),
        },
        TabAction::AttachTab { page } => TabState {
            pages: vec![page.clone()],
            page_order: vec![0],
            current_page_index: 0,
        },
        TabAction::CloseTab { page_index } => close_tab(state, *page_index),
        TabAction::SetLocation { user_typed } => {
            let mut next = state.clone();
            if let Some(page) = next.pages.get_mut(next.current_page_index) {
                page.user_typed = user_typed.clone();
            }
            next
        }
        TabAction::SetPageDetails {
            page_index,
            details,
        } => {
            let index = page_index.unwrap_or(state.current_page_index);
            let mut next = state.clone();
            if let Some(page) = next.pages.get_mut(index) {
                details.apply_to(page);
            }
            next
        }
        TabAction::SetCurrentTab { page_index } => {
            if *page_index >= state.pages.len() {
                return state.clone();
            }
            let mut next = state.clone();
            next.current_page_index = *page_index;
            next
        }
        TabAction::SetPageOrder { order } => {
            if !is_permutation(order, state.pages.len()) {
                return state.clone();
            }
            let mut next = state.clone();
            next.page_order = order.clone();
            next
        }
    }
}

/// Appends a page, appends its index to the display order, and selects it.
fn append_page(state: &TabState, page: Page) -> TabState {
    let mut next = state.clone();
    next.pages.push(page);
    let new_index = next.pages.len() - 1;
    next.page_order.push(new_index);
    next.current_page_index = new_index;
    next
}

/// Removes the page at `page_index` from both the page collection and the
/// display order.
///
/// Invariant on return: `page_order` is exactly a permutation of the remaining
/// page indices and `current_page_index` addresses a live page. Closing the
/// last page resets to the initial state.
fn close_tab(state: &TabState, page_index: usize) -> TabState {
    if page_index >= state.pages.len() {
        return state.clone();
    }
    if state.pages.len() == 1 {
        return TabState::initial();
    }

    let mut next = state.clone();
    // Display position of the closed page, needed for the selection rule below.
    let removed_display_pos = next
        .page_order
        .iter()
        .position(|&index| index == page_index)
        .unwrap_or(0);

    next.pages.remove(page_index);
    next.page_order.retain(|&index| index != page_index);
    // Renumber: entries past the removed index shift down by one.
    for index in next.page_order.iter_mut() {
        if *index > page_index {
            *index -= 1;
        }
    }

    if state.current_page_index == page_index {
        // Select the page that sat immediately before the closed one in display
        // order, or display position 0 when the closed page led the order.
        let display_pos = removed_display_pos.saturating_sub(1);
        next.current_page_index = next.page_order[display_pos];
    } else if next.current_page_index > page_index {
        next.current_page_index -= 1;
    }

    debug_assert!(next.is_well_formed());
    next
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}
