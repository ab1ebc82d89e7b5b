//! Cross-window profile commands.
//!
//! A command spans the storage layer and the live profile store. Handling is
//! sequential per command: the storage operation is awaited first, and the
//! state-changing action is dispatched only once storage has settled — either
//! the whole command applies or nothing reaches the shared store.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::database::SessionStore;
use crate::services::replication::WindowRegistry;
use crate::services::star_sync::{SyncQueue, SyncRequest};
use crate::state::actions::ProfileAction;
use crate::state::store::Store;
use crate::types::errors::CommandError;
use crate::types::page::Page;
use crate::types::profile::ProfileState;

/// The live profile store, locked around each dispatch.
pub type ProfileStore = Arc<Mutex<Store<ProfileState, ProfileAction>>>;

/// Commands spanning window lifecycle and storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileCommand {
    /// Open a fresh browser window backed by a new session.
    NewWindow,
    /// Detach a tab into a new window; the new session records the source
    /// page's session as its ancestor.
    NewWindowFromTab { page: Page },
    /// Close a window and its backing session.
    CloseWindow { window_id: String },
    /// Star a location: durable record, profile state, then remote sync.
    Bookmark {
        session_id: String,
        url: String,
        title: Option<String>,
    },
    /// Unstar a location.
    Unbookmark { session_id: String, url: String },
    /// Record a page visit for autocomplete history.
    RecordVisit {
        session_id: String,
        url: String,
        title: Option<String>,
    },
}

/// What a successfully handled command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    WindowOpened {
        window_id: String,
        session_id: String,
        /// Present when the window was opened from a detached tab; the window's
        /// tab store seeds itself by dispatching `AttachTab` with this page.
        attach: Option<Page>,
    },
    WindowClosed { window_id: String },
    Starred { url: String },
    Unstarred { url: String },
    VisitRecorded { url: String },
}

/// Dispatches profile commands against storage and the live store.
pub struct CommandHandler {
    store: ProfileStore,
    sessions: Arc<SessionStore>,
    windows: WindowRegistry,
    sync: SyncQueue,
}

impl CommandHandler {
    pub fn new(
        store: ProfileStore,
        sessions: Arc<SessionStore>,
        windows: WindowRegistry,
        sync: SyncQueue,
    ) -> Self {
        Self {
            store,
            sessions,
            windows,
            sync,
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn dispatch(&self, action: ProfileAction) {
        self.store.lock().unwrap().dispatch(action);
    }

    /// Handles one command to completion.
    ///
    /// Storage failures abort the command before any action is dispatched.
    /// Remote sync is enqueued after the local commit and never fails the
    /// command.
    pub async fn handle(&self, command: ProfileCommand) -> Result<CommandOutcome, CommandError> {
        match command {
            ProfileCommand::NewWindow => self.open_window(None, None).await,
            ProfileCommand::NewWindowFromTab { page } => {
                let ancestor = page
                    .session_id
                    .clone()
                    .ok_or_else(|| CommandError::MissingSession(page.location.clone()))?;
                self.open_window(Some(&ancestor), Some(page)).await
            }
            ProfileCommand::CloseWindow { window_id } => {
                let session_id = self
                    .windows
                    .session_for(&window_id)
                    .ok_or_else(|| CommandError::WindowNotFound(window_id.clone()))?;
                self.sessions.end_session(&session_id).await?;
                self.dispatch(ProfileAction::CloseWindow {
                    window_id: window_id.clone(),
                });
                Ok(CommandOutcome::WindowClosed { window_id })
            }
            ProfileCommand::Bookmark {
                session_id,
                url,
                title,
            } => {
                self.sessions
                    .star(&session_id, &url, title.as_deref())
                    .await?;
                self.dispatch(ProfileAction::Bookmark { url: url.clone() });
                self.sync.enqueue(SyncRequest::Star {
                    url: url.clone(),
                    session_id,
                });
                Ok(CommandOutcome::Starred { url })
            }
            ProfileCommand::Unbookmark { session_id, url } => {
                self.sessions.unstar(&session_id, &url).await?;
                self.dispatch(ProfileAction::Unbookmark { url: url.clone() });
                self.sync.enqueue(SyncRequest::Unstar {
                    url: url.clone(),
                    session_id,
                });
                Ok(CommandOutcome::Unstarred { url })
            }
            ProfileCommand::RecordVisit {
                session_id,
                url,
                title,
            } => {
                self.sessions
                    .record_visit(&session_id, &url, title.as_deref())
                    .await?;
                self.dispatch(ProfileAction::RecordLocation {
                    url: url.clone(),
                    title,
                    visited_at: Self::now(),
                });
                Ok(CommandOutcome::VisitRecorded { url })
            }
        }
    }

    /// Allocates a session, registers the window, and announces it to the
    /// profile store. The window becomes visible only after its load signal.
    async fn open_window(
        &self,
        ancestor: Option<&str>,
        detached: Option<Page>,
    ) -> Result<CommandOutcome, CommandError> {
        let session_id = self.sessions.start_session(ancestor).await?;
        let window_id = Uuid::new_v4().to_string();
        self.windows.register(&window_id, &session_id);

        let attach = detached.map(|mut page| {
            page.session_id = Some(session_id.clone());
            page
        });

        self.dispatch(ProfileAction::AddWindow {
            window_id: window_id.clone(),
        });

        Ok(CommandOutcome::WindowOpened {
            window_id,
            session_id,
            attach,
        })
    }
}
