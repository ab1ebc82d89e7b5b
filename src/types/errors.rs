use std::fmt;

// === StorageError ===

/// Errors related to the durable session/star storage layer.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// Session with the given ID was not found.
    SessionNotFound(String),
    /// The session is already closed.
    SessionClosed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            StorageError::SessionClosed(id) => write!(f, "Session already closed: {}", id),
        }
    }
}

impl std::error::Error for StorageError {}

// === CommandError ===

/// Errors related to profile command handling.
#[derive(Debug)]
pub enum CommandError {
    /// The underlying storage operation failed; no state change was applied.
    Storage(StorageError),
    /// Window with the given ID was not found in the registry.
    WindowNotFound(String),
    /// The page carried no session handle where one was required.
    MissingSession(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Storage(err) => write!(f, "Command storage error: {}", err),
            CommandError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            CommandError::MissingSession(url) => {
                write!(f, "Page has no session handle: {}", url)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        CommandError::Storage(err)
    }
}

// === SyncError ===

/// Errors related to remote star synchronization.
#[derive(Debug)]
pub enum SyncError {
    /// A network error occurred while reaching the star service.
    NetworkError(String),
    /// The star service returned a non-success status code.
    ServiceStatus(u16),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NetworkError(msg) => write!(f, "Star sync network error: {}", msg),
            SyncError::ServiceStatus(code) => {
                write!(f, "Star service returned status {}", code)
            }
        }
    }
}

impl std::error::Error for SyncError {}
