//! Match engine, feed generator and conversation store over an injected
//! [`Database`] handle.
//!
//! Every operation re-reads the store; nothing is cached between calls.
//! Store calls are blocking and run on tokio's blocking pool.

pub mod conversations;
pub mod error;
pub mod feed;
pub mod matches;
pub mod profiles;

use std::sync::Arc;

use pawfectly_db::{Database, DbError};
use tracing::error;

pub use conversations::ConversationStore;
pub use error::CoreError;
pub use feed::FeedGenerator;
pub use matches::MatchEngine;
pub use profiles::ProfileDirectory;

/// All components, wired to the same store.
#[derive(Clone)]
pub struct Services {
    pub matches: MatchEngine,
    pub feed: FeedGenerator,
    pub conversations: ConversationStore,
    pub profiles: ProfileDirectory,
}

impl Services {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            matches: MatchEngine::new(db.clone()),
            feed: FeedGenerator::new(db.clone()),
            conversations: ConversationStore::new(db.clone()),
            profiles: ProfileDirectory::new(db),
        }
    }
}

/// Run a store call off the async runtime and classify its failure.
pub(crate) async fn blocking<F, T>(db: &Arc<Database>, op: &'static str, f: F) -> Result<T, CoreError>
where
    F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error in {}: {}", op, e);
            CoreError::Storage(format!("{op}: store task failed"))
        })?
        .map_err(|e| CoreError::from_store(op, e))
}

pub(crate) fn require_id(value: i64, what: &str) -> Result<i64, CoreError> {
    if value <= 0 {
        return Err(CoreError::InvalidInput(format!("{what} must be a positive id")));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use chrono::Utc;
    use pawfectly_db::Database;
    use pawfectly_types::models::UserId;
    use tempfile::TempDir;

    use crate::Services;

    pub fn services() -> (TempDir, Arc<Database>, Services) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open_with_readers(&dir.path().join("core.db"), 2).unwrap());
        let services = Services::new(db.clone());
        (dir, db, services)
    }

    pub fn user(db: &Database, email: &str) -> UserId {
        db.create_user(email, "hash", Utc::now()).unwrap()
    }

    /// Rows stored for the pair in either orientation.
    pub fn match_count(db: &Database, a: UserId, b: UserId) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM matches
                 WHERE (userid1 = ?1 AND userid2 = ?2) OR (userid1 = ?2 AND userid2 = ?1)",
                (a, b),
                |row| row.get(0),
            )?)
        })
        .unwrap()
    }

    /// Insert a user with a fixed id.
    pub fn user_with_id(db: &Database, id: UserId, email: &str) {
        db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password, created_at) VALUES (?1, ?2, 'hash', ?3)",
                (id, email, Utc::now()),
            )?;
            Ok(())
        })
        .unwrap();
    }
}
