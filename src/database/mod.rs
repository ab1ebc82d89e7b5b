//! Durable storage: SQLite connection, schema migrations, and the
//! asynchronous session/star store.

pub mod connection;
pub mod migrations;
pub mod session_store;

pub use connection::Database;
pub use session_store::SessionStore;
