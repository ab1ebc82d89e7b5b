use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default location for freshly created tabs and the reset home page.
pub const DEFAULT_LOCATION: &str = "about:blank";

/// One browser tab's addressable content and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub id: String,
    pub location: String,
    pub title: String,
    /// Pending address-bar text, not yet committed to a navigation.
    pub user_typed: String,
    /// Opaque storage session handle for this page's window lineage.
    pub session_id: Option<String>,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl Page {
    /// Creates a new page at the given location with fresh render metadata.
    pub fn new(location: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            location: location.to_string(),
            title: String::new(),
            user_typed: String::new(),
            session_id: None,
            loading: false,
            can_go_back: false,
            can_go_forward: false,
        }
    }

    /// Creates the home page used by the initial tab state.
    pub fn home() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

/// A batch of field updates applied to a single page.
///
/// Every field is optional and applied independently; a field left as `None`
/// leaves the page value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageDetails {
    pub location: Option<String>,
    pub title: Option<String>,
    pub user_typed: Option<String>,
    pub session_id: Option<String>,
    pub loading: Option<bool>,
    pub can_go_back: Option<bool>,
    pub can_go_forward: Option<bool>,
}

impl PageDetails {
    /// Applies every set field to the target page.
    pub fn apply_to(&self, page: &mut Page) {
        if let Some(location) = &self.location {
            page.location = location.clone();
        }
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(user_typed) = &self.user_typed {
            page.user_typed = user_typed.clone();
        }
        if let Some(session_id) = &self.session_id {
            page.session_id = Some(session_id.clone());
        }
        if let Some(loading) = self.loading {
            page.loading = loading;
        }
        if let Some(can_go_back) = self.can_go_back {
            page.can_go_back = can_go_back;
        }
        if let Some(can_go_forward) = self.can_go_forward {
            page.can_go_forward = can_go_forward;
        }
    }
}
