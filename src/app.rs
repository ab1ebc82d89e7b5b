//! App core for tabshell.
//!
//! Wires the profile store, diff engine, replicator, storage and command
//! handler together. The main process owns exactly one `App`; chrome windows
//! interact with it only through dispatched commands and the bootstrap query.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::database::SessionStore;
use crate::services::command_handler::{CommandHandler, ProfileStore};
use crate::services::diff_engine::DiffEngine;
use crate::services::replication::{Replicator, ReplicationChannel, TracingChannel, WindowRegistry};
use crate::services::star_sync::{HttpStarTransport, StarTransport, SyncQueue};
use crate::state::actions::ProfileAction;
use crate::state::profile_reducer;
use crate::state::store::Store;
use crate::types::errors::StorageError;
use crate::types::profile::{BootstrapPayload, ProfileState, RECENT_BOOKMARKS_CAP};

/// Central application struct owning the profile state machine and its
/// collaborators.
pub struct App {
    pub sessions: Arc<SessionStore>,
    pub profile_store: ProfileStore,
    pub windows: WindowRegistry,
    pub commands: CommandHandler,
    pub sync: SyncQueue,
}

impl App {
    /// Creates an `App` against a database path (or in-memory when `None`)
    /// with the default replication channel and the HTTP star transport.
    pub async fn new(
        db_path: Option<&Path>,
        star_service_url: &str,
    ) -> Result<Self, StorageError> {
        Self::with_collaborators(
            db_path,
            Arc::new(TracingChannel),
            Arc::new(HttpStarTransport::new(star_service_url)),
        )
        .await
    }

    /// Creates an `App` with injected replication channel and star transport.
    /// Used by tests to observe the outward-facing surfaces.
    pub async fn with_collaborators(
        db_path: Option<&Path>,
        channel: Arc<dyn ReplicationChannel>,
        transport: Arc<dyn StarTransport>,
    ) -> Result<Self, StorageError> {
        let sessions = Arc::new(match db_path {
            Some(path) => SessionStore::open(path).await?,
            None => SessionStore::open_in_memory().await?,
        });

        let windows = WindowRegistry::new();
        let replicator = Replicator::new(channel, windows.clone());

        let mut store = Store::new(ProfileState::default(), profile_reducer::reduce);
        let mut diff = DiffEngine::new(store.state());
        store.subscribe(move |state: &ProfileState| {
            let events = diff.observe(state);
            if !events.is_empty() {
                replicator.apply(events);
            }
        });
        let profile_store: ProfileStore = Arc::new(Mutex::new(store));

        let (sync, _worker) = SyncQueue::spawn(transport);

        let commands = CommandHandler::new(
            profile_store.clone(),
            sessions.clone(),
            windows.clone(),
            sync.clone(),
        );

        Ok(Self {
            sessions,
            profile_store,
            windows,
            commands,
            sync,
        })
    }

    /// Startup sequence: seed the profile state from durable storage.
    pub async fn startup(&self) -> Result<(), StorageError> {
        let starred = self.sessions.starred().await?;
        let recent = self.sessions.recently_starred(RECENT_BOOKMARKS_CAP).await?;
        let locations = self.sessions.visited_locations().await?;

        let mut store = self.profile_store.lock().unwrap();
        store.dispatch(ProfileAction::SeedBookmarks {
            bookmarks: starred.into_iter().map(|star| star.url).collect(),
            recent: recent.into_iter().map(|star| star.url).collect(),
        });
        store.dispatch(ProfileAction::SeedLocations { locations });
        Ok(())
    }

    /// Answers a window's ready signal with the bookmark snapshot.
    pub fn window_bootstrap(&self) -> BootstrapPayload {
        self.profile_store.lock().unwrap().state().bootstrap()
    }
}
