//! Asynchronous session/star store for tabshell.
//!
//! Wraps the synchronous SQLite [`Database`] behind an async handle so callers
//! in the command path can await storage operations. One session is created
//! per browser window; stars and visits are keyed by the session that created
//! them. The store is the sole writer of session and star records.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::errors::StorageError;
use crate::types::profile::LocationMeta;
use crate::types::session::{SessionRecord, StarredLocation};

/// Async store of sessions, starred locations and visit history.
pub struct SessionStore {
    db: Mutex<Database>,
}

impl SessionStore {
    /// Opens (or creates) the store at the given path.
    ///
    /// A failed open is fatal to startup; callers are expected to abort.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::open(path).map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(Self { db: Mutex::new(db) })
    }

    /// Opens an in-memory store, used by tests and the demo binary.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let db =
            Database::open_in_memory().map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Allocates a new session, optionally recording its ancestor session.
    ///
    /// Returns the new session id.
    pub async fn start_session(&self, ancestor: Option<&str>) -> Result<String, StorageError> {
        let db = self.db.lock().await;
        if let Some(ancestor_id) = ancestor {
            let exists: i64 = db
                .connection()
                .query_row(
                    "SELECT COUNT(*) FROM sessions WHERE id = ?1",
                    rusqlite::params![ancestor_id],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
            if exists == 0 {
                return Err(StorageError::SessionNotFound(ancestor_id.to_string()));
            }
        }

        let id = Uuid::new_v4().to_string();
        db.connection()
            .execute(
                "INSERT INTO sessions (id, ancestor, opened_at, closed_at) VALUES (?1, ?2, ?3, NULL)",
                rusqlite::params![id, ancestor, Self::now()],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(id)
    }

    /// Closes a session, recording its end-of-life timestamp.
    pub async fn end_session(&self, id: &str) -> Result<(), StorageError> {
        let db = self.db.lock().await;
        let affected = db
            .connection()
            .execute(
                "UPDATE sessions SET closed_at = ?1 WHERE id = ?2 AND closed_at IS NULL",
                rusqlite::params![Self::now(), id],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        if affected == 0 {
            let exists: i64 = db
                .connection()
                .query_row(
                    "SELECT COUNT(*) FROM sessions WHERE id = ?1",
                    rusqlite::params![id],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
            if exists == 0 {
                return Err(StorageError::SessionNotFound(id.to_string()));
            }
            return Err(StorageError::SessionClosed(id.to_string()));
        }
        Ok(())
    }

    /// Looks up one session record by id.
    pub async fn session(&self, id: &str) -> Result<Option<SessionRecord>, StorageError> {
        let db = self.db.lock().await;
        let result = db.connection().query_row(
            "SELECT id, ancestor, opened_at, closed_at FROM sessions WHERE id = ?1",
            rusqlite::params![id],
            |row| {
                Ok(SessionRecord {
                    id: row.get(0)?,
                    ancestor: row.get(1)?,
                    opened_at: row.get(2)?,
                    closed_at: row.get(3)?,
                })
            },
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::DatabaseError(e.to_string())),
        }
    }

    /// Stars a location on behalf of a session. Re-starring replaces the record.
    pub async fn star(
        &self,
        session_id: &str,
        url: &str,
        title: Option<&str>,
    ) -> Result<(), StorageError> {
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT OR REPLACE INTO stars (url, session_id, title, starred_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![url, session_id, title, Self::now()],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Removes a starred location. Unstarring an unknown URL is a no-op.
    pub async fn unstar(&self, _session_id: &str, url: &str) -> Result<(), StorageError> {
        let db = self.db.lock().await;
        db.connection()
            .execute("DELETE FROM stars WHERE url = ?1", rusqlite::params![url])
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// All starred locations, most recently starred first.
    pub async fn starred(&self) -> Result<Vec<StarredLocation>, StorageError> {
        self.starred_query(None).await
    }

    /// The most recently starred locations, capped at `limit`.
    pub async fn recently_starred(&self, limit: usize) -> Result<Vec<StarredLocation>, StorageError> {
        self.starred_query(Some(limit)).await
    }

    async fn starred_query(&self, limit: Option<usize>) -> Result<Vec<StarredLocation>, StorageError> {
        let db = self.db.lock().await;
        let sql = match limit {
            Some(_) => {
                "SELECT url, session_id, title, starred_at FROM stars \
                 ORDER BY starred_at DESC, url LIMIT ?1"
            }
            None => {
                "SELECT url, session_id, title, starred_at FROM stars \
                 ORDER BY starred_at DESC, url"
            }
        };
        let conn = db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let row_to_star = |row: &rusqlite::Row| -> rusqlite::Result<StarredLocation> {
            Ok(StarredLocation {
                url: row.get(0)?,
                session_id: row.get(1)?,
                title: row.get(2)?,
                starred_at: row.get(3)?,
            })
        };

        let rows = match limit {
            Some(n) => stmt.query_map(rusqlite::params![n as i64], row_to_star),
            None => stmt.query_map([], row_to_star),
        }
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| StorageError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    /// Records one page visit for autocomplete history.
    pub async fn record_visit(
        &self,
        session_id: &str,
        url: &str,
        title: Option<&str>,
    ) -> Result<(), StorageError> {
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO visits (id, session_id, url, title, visited_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![Uuid::new_v4().to_string(), session_id, url, title, Self::now()],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Aggregated visit history: one entry per location with visit count,
    /// latest title and last visit time. Used to seed the locations map.
    pub async fn visited_locations(&self) -> Result<Vec<(String, LocationMeta)>, StorageError> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT url, COUNT(*), MAX(visited_at), \
                 (SELECT title FROM visits v2 WHERE v2.url = visits.url \
                  AND title IS NOT NULL \
                  ORDER BY visited_at DESC, rowid DESC LIMIT 1) \
                 FROM visits GROUP BY url ORDER BY MAX(visited_at) DESC",
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let url: String = row.get(0)?;
                let meta = LocationMeta {
                    visit_count: row.get::<_, i64>(1)? as u32,
                    last_visited: row.get(2)?,
                    title: row.get(3)?,
                };
                Ok((url, meta))
            })
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| StorageError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }
}
