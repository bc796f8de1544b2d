use std::sync::Arc;

use chrono::Utc;
use pawfectly_db::Database;
use pawfectly_types::models::{MatchId, Room, ThreadMessage, UserId};
use tracing::debug;

use crate::{CoreError, blocking, require_id};

/// Message threads attached to match records.
#[derive(Clone)]
pub struct ConversationStore {
    db: Arc<Database>,
}

impl ConversationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a message with a server-assigned timestamp.
    ///
    /// Neither the match status nor the sender's membership in the match is
    /// checked.
    pub async fn append(
        &self,
        match_id: MatchId,
        sender_id: UserId,
        body: String,
    ) -> Result<ThreadMessage, CoreError> {
        require_id(match_id, "match")?;
        require_id(sender_id, "sender")?;
        if body.is_empty() {
            return Err(CoreError::InvalidInput("message body is required".into()));
        }

        let now = Utc::now();
        let row = blocking(&self.db, "append_message", move |db| {
            db.insert_message(match_id, sender_id, &body, now)
        })
        .await?;

        debug!("Message {} appended to match {} by {}", row.id, match_id, sender_id);
        Ok(row.into())
    }

    /// Every message of the match, oldest first.
    pub async fn thread(&self, match_id: MatchId) -> Result<Vec<ThreadMessage>, CoreError> {
        require_id(match_id, "match")?;

        let rows = blocking(&self.db, "thread", move |db| db.get_thread(match_id))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("match {match_id} does not exist")))?;

        Ok(rows.into_iter().map(ThreadMessage::from).collect())
    }

    /// One entry per active match of `user_id`, with the latest message if
    /// there is one.
    pub async fn rooms(&self, user_id: UserId) -> Result<Vec<Room>, CoreError> {
        require_id(user_id, "user")?;

        let rows = blocking(&self.db, "rooms", move |db| db.get_rooms(user_id))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("user {user_id} does not exist")))?;

        Ok(rows.into_iter().map(Room::from).collect())
    }
}
