use std::sync::Arc;

use pawfectly_db::Database;
use pawfectly_types::models::{Candidate, UserId};

use crate::{CoreError, blocking, require_id};

/// Produces the candidate list a user browses.
#[derive(Clone)]
pub struct FeedGenerator {
    db: Arc<Database>,
}

impl FeedGenerator {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Everyone `user_id` has not acted on yet, minus users who resolved a
    /// record toward `user_id`. Someone with a pending proposal toward
    /// `user_id` stays visible until `user_id` answers.
    pub async fn candidates(&self, user_id: UserId) -> Result<Vec<Candidate>, CoreError> {
        require_id(user_id, "requesting user")?;

        let rows = blocking(&self.db, "candidates", move |db| {
            if !db.user_exists(user_id)? {
                return Ok(None);
            }
            db.get_candidates(user_id).map(Some)
        })
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("user {user_id} does not exist")))?;

        Ok(rows.into_iter().map(|row| row.into_candidate()).collect())
    }
}

#[cfg(test)]
mod tests {
    use pawfectly_types::models::DesiredStatus;

    use crate::testutil::*;
    use crate::{CoreError, Services};

    async fn feed_ids(services: &Services, user: i64) -> Vec<i64> {
        services
            .feed
            .candidates(user)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    #[tokio::test]
    async fn pending_exclusion_is_one_sided() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");

        services.matches.propose_or_respond(a, b, DesiredStatus::Match).await.unwrap();
        assert!(!feed_ids(&services, a).await.contains(&b));
        assert!(feed_ids(&services, b).await.contains(&a));

        services.matches.propose_or_respond(b, a, DesiredStatus::Match).await.unwrap();
        assert!(!feed_ids(&services, b).await.contains(&a));
        assert!(!feed_ids(&services, a).await.contains(&b));
    }

    #[tokio::test]
    async fn unmatch_hides_both_sides() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");

        services.matches.propose_or_respond(a, b, DesiredStatus::Unmatch).await.unwrap();
        assert!(feed_ids(&services, a).await.is_empty());
        assert!(feed_ids(&services, b).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_or_invalid_requester() {
        let (_dir, _db, services) = services();
        assert!(matches!(
            services.feed.candidates(12).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            services.feed.candidates(-1).await,
            Err(CoreError::InvalidInput(_))
        ));
    }
}
