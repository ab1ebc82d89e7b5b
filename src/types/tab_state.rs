use serde::{Deserialize, Serialize};

use super::page::Page;

/// One window's ordered tab collection plus selection.
///
/// `pages` holds tab content in storage order; `page_order` is a permutation of
/// page indices giving display order, so tabs can be reordered without moving
/// their content. `current_page_index` indexes into `pages`, not `page_order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabState {
    pub pages: Vec<Page>,
    pub page_order: Vec<usize>,
    pub current_page_index: usize,
}

impl TabState {
    /// The single-home-page state a window starts in (and resets to when its
    /// last tab closes).
    pub fn initial() -> Self {
        Self {
            pages: vec![Page::home()],
            page_order: vec![0],
            current_page_index: 0,
        }
    }

    /// The currently selected page, if the state is well-formed.
    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page_index)
    }

    /// Checks the structural invariant: `page_order` is a permutation of
    /// `0..pages.len()` and the selection addresses a live page.
    pub fn is_well_formed(&self) -> bool {
        if self.page_order.len() != self.pages.len() {
            return false;
        }
        let mut seen = vec![false; self.pages.len()];
        for &index in &self.page_order {
            if index >= self.pages.len() || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        self.current_page_index < self.pages.len()
    }
}

impl Default for TabState {
    fn default() -> Self {
        Self::initial()
    }
}
