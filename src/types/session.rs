use serde::{Deserialize, Serialize};

/// A storage-layer record identifying one window's lineage for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    /// Session this one was forked from (tab detach/duplicate lineage).
    pub ancestor: Option<String>,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
}

impl SessionRecord {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// A durable starred location, associated with the session that created it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarredLocation {
    pub url: String,
    pub session_id: String,
    pub title: Option<String>,
    pub starred_at: i64,
}
