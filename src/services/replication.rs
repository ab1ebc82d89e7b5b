//! Window registry and the replication side of the diff engine.
//!
//! Window creation is asynchronous: the chrome process signals "finished
//! loading" some time after the window id enters the profile state. Effects
//! that depend on a window (show, close) are scheduled to run only after that
//! signal, and every by-id lookup tolerates the window having been destroyed
//! in the meantime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::debug;

use crate::services::diff_engine::{ReplicationEvent, PROFILE_DIFF_EVENT};

/// Fire-and-forget event channel from the main process to one window.
///
/// Decoupled from any concrete transport; production wires this to IPC, tests
/// plug in a recorder.
pub trait ReplicationChannel: Send + Sync {
    fn send(&self, window_id: &str, event: &str, payload: &Value);
}

/// Default channel that traces every send instead of crossing a process
/// boundary. Stands in until a real IPC transport is wired up.
#[derive(Debug, Default)]
pub struct TracingChannel;

impl ReplicationChannel for TracingChannel {
    fn send(&self, window_id: &str, event: &str, payload: &Value) {
        debug!(window = %window_id, event, %payload, "replication send");
    }
}

struct WindowEntry {
    session_id: String,
    loaded: bool,
    visible: bool,
    waiters: Vec<oneshot::Sender<()>>,
}

/// Live browser-chrome windows keyed by id, with async load tracking.
#[derive(Clone, Default)]
pub struct WindowRegistry {
    inner: Arc<Mutex<HashMap<String, WindowEntry>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly created (not yet loaded, not yet visible) window.
    pub fn register(&self, window_id: &str, session_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            window_id.to_string(),
            WindowEntry {
                session_id: session_id.to_string(),
                loaded: false,
                visible: false,
                waiters: Vec::new(),
            },
        );
    }

    /// Marks a window as finished loading and wakes everything waiting on it.
    pub fn mark_loaded(&self, window_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.get_mut(window_id) {
            entry.loaded = true;
            for waiter in entry.waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    /// Resolves once the window has finished loading.
    ///
    /// Returns `false` if the window does not exist or is destroyed before the
    /// load completes.
    pub async fn when_loaded(&self, window_id: &str) -> bool {
        let receiver = {
            let mut inner = self.inner.lock().unwrap();
            match inner.get_mut(window_id) {
                None => return false,
                Some(entry) if entry.loaded => return true,
                Some(entry) => {
                    let (tx, rx) = oneshot::channel();
                    entry.waiters.push(tx);
                    rx
                }
            }
        };
        // A dropped sender means the window went away while we waited.
        receiver.await.is_ok()
    }

    /// Makes a window visible. Returns `false` if the window is gone.
    pub fn show(&self, window_id: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.get_mut(window_id) {
            Some(entry) => {
                entry.visible = true;
                true
            }
            None => false,
        }
    }

    /// Destroys a window, returning its session id if it was still live.
    /// Pending load waiters observe the destruction.
    pub fn remove(&self, window_id: &str) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.remove(window_id).map(|entry| entry.session_id)
    }

    pub fn contains(&self, window_id: &str) -> bool {
        self.inner.lock().unwrap().contains_key(window_id)
    }

    pub fn is_visible(&self, window_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .get(window_id)
            .map(|entry| entry.visible)
            .unwrap_or(false)
    }

    pub fn session_for(&self, window_id: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .get(window_id)
            .map(|entry| entry.session_id.clone())
    }

    /// Ids of all live windows.
    pub fn ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

/// Event name for menu reconstruction notifications.
pub const MENU_REBUILD_EVENT: &str = "menu-rebuild";

/// Applies diff-engine events: broadcasts data diffs to every live window and
/// schedules window lifecycle effects behind the load signal.
#[derive(Clone)]
pub struct Replicator {
    channel: Arc<dyn ReplicationChannel>,
    windows: WindowRegistry,
}

impl Replicator {
    pub fn new(channel: Arc<dyn ReplicationChannel>, windows: WindowRegistry) -> Self {
        Self { channel, windows }
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Applies one batch of replication events.
    ///
    /// Show/close effects run on background tasks gated on the window's load
    /// future; a window destroyed before its load completes is skipped.
    pub fn apply(&self, events: Vec<ReplicationEvent>) {
        for event in events {
            match event {
                ReplicationEvent::ShowWindow { window_id } => {
                    let windows = self.windows.clone();
                    tokio::spawn(async move {
                        if windows.when_loaded(&window_id).await {
                            windows.show(&window_id);
                        } else {
                            debug!(window = %window_id, "window gone before load, skipping show");
                        }
                    });
                }
                ReplicationEvent::CloseWindow { window_id } => {
                    let windows = self.windows.clone();
                    tokio::spawn(async move {
                        if windows.when_loaded(&window_id).await {
                            windows.remove(&window_id);
                        } else {
                            debug!(window = %window_id, "window gone before load, skipping close");
                        }
                    });
                }
                ReplicationEvent::RebuildMenu { recent_bookmarks } => {
                    let payload = json!({ "recentBookmarks": recent_bookmarks });
                    self.broadcast(MENU_REBUILD_EVENT, &payload);
                }
                ReplicationEvent::ProfileDiff { payload } => {
                    self.broadcast(PROFILE_DIFF_EVENT, &payload);
                }
            }
        }
    }

    fn broadcast(&self, event: &str, payload: &Value) {
        for window_id in self.windows.ids() {
            self.channel.send(&window_id, event, payload);
        }
    }
}
