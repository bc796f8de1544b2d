use std::sync::Arc;

use chrono::Utc;
use pawfectly_db::Database;
use pawfectly_types::models::{DesiredStatus, MatchId, MatchRecord, ProposalOutcome, UserId};
use tracing::{debug, info};

use crate::{CoreError, blocking, require_id};

/// Owns the lifecycle of the relationship between two users.
#[derive(Clone)]
pub struct MatchEngine {
    db: Arc<Database>,
}

impl MatchEngine {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// `actor` proposes to, or answers, `other`.
    ///
    /// | current  | match              | unmatch            |
    /// |----------|--------------------|--------------------|
    /// | absent   | create `pending`   | create `unmatch`   |
    /// | pending  | resolve to `match` | resolve to `unmatch` |
    /// | terminal | no change          | no change          |
    ///
    /// A terminal record yields [`ProposalOutcome::Unchanged`], which is a
    /// successful "already resolved" answer, not an error.
    pub async fn propose_or_respond(
        &self,
        actor: UserId,
        other: UserId,
        desired: DesiredStatus,
    ) -> Result<ProposalOutcome, CoreError> {
        require_id(actor, "acting user")?;
        require_id(other, "target user")?;
        if actor == other {
            return Err(CoreError::InvalidInput(
                "a user cannot match with themselves".into(),
            ));
        }

        let now = Utc::now();
        let outcome = blocking(&self.db, "propose_or_respond", move |db| {
            db.propose_or_respond(actor, other, desired, now)
        })
        .await?;

        match outcome {
            ProposalOutcome::Created { match_id, status } => {
                info!("User {} opened match {} with {} as {}", actor, match_id, other, status)
            }
            ProposalOutcome::Transitioned { match_id, status } => {
                info!("User {} resolved match {} with {} to {}", actor, match_id, other, status)
            }
            ProposalOutcome::Unchanged => {
                debug!("User {} -> {}: pair already resolved", actor, other)
            }
        }

        Ok(outcome)
    }

    pub async fn record(&self, match_id: MatchId) -> Result<MatchRecord, CoreError> {
        require_id(match_id, "match")?;
        blocking(&self.db, "get_match", move |db| db.get_match(match_id))
            .await?
            .map(MatchRecord::from)
            .ok_or_else(|| CoreError::NotFound(format!("match {match_id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use pawfectly_types::models::{DesiredStatus, MatchStatus, ProposalOutcome};

    use crate::CoreError;
    use crate::testutil::*;

    #[tokio::test]
    async fn mutual_match_in_either_order() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let c = user(&db, "c@example.com");
        let engine = &services.matches;

        // reversed order resolves
        let first = engine.propose_or_respond(a, b, DesiredStatus::Match).await.unwrap();
        assert_eq!(first.status(), Some(MatchStatus::Pending));
        let second = engine.propose_or_respond(b, a, DesiredStatus::Match).await.unwrap();
        assert_eq!(second.status(), Some(MatchStatus::Match));
        assert_eq!(second.match_id(), first.match_id());

        // so does the same order
        let first = engine.propose_or_respond(a, c, DesiredStatus::Match).await.unwrap();
        let second = engine.propose_or_respond(a, c, DesiredStatus::Match).await.unwrap();
        assert_eq!(second.status(), Some(MatchStatus::Match));
        assert_eq!(second.match_id(), first.match_id());
    }

    #[tokio::test]
    async fn pending_can_be_rejected() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");

        services.matches.propose_or_respond(a, b, DesiredStatus::Match).await.unwrap();
        let answer = services
            .matches
            .propose_or_respond(b, a, DesiredStatus::Unmatch)
            .await
            .unwrap();
        assert!(matches!(
            answer,
            ProposalOutcome::Transitioned { status: MatchStatus::Unmatch, .. }
        ));
    }

    #[tokio::test]
    async fn terminal_state_returns_unchanged() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let engine = &services.matches;

        engine.propose_or_respond(a, b, DesiredStatus::Match).await.unwrap();
        engine.propose_or_respond(b, a, DesiredStatus::Match).await.unwrap();

        for desired in [DesiredStatus::Match, DesiredStatus::Unmatch] {
            let outcome = engine.propose_or_respond(a, b, desired).await.unwrap();
            assert_eq!(outcome, ProposalOutcome::Unchanged);
            assert_eq!(outcome.match_id(), 0);
            assert_eq!(outcome.status(), None);
        }
        let row = db.get_match_between(a, b).unwrap().unwrap();
        assert_eq!(row.status, MatchStatus::Match);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reversed_proposals_yield_one_record() {
        let (_dir, db, services) = services();

        for round in 0..10 {
            let a = user(&db, &format!("a{round}@example.com"));
            let b = user(&db, &format!("b{round}@example.com"));

            let (left, right) = tokio::join!(
                services.matches.propose_or_respond(a, b, DesiredStatus::Match),
                services.matches.propose_or_respond(b, a, DesiredStatus::Match),
            );
            let (left, right) = (left.unwrap(), right.unwrap());

            assert_eq!(match_count(&db, a, b), 1);
            assert_eq!(left.match_id(), right.match_id());
            let mut statuses = [left.status().unwrap(), right.status().unwrap()];
            statuses.sort_by_key(|s| s.as_str());
            assert_eq!(statuses, [MatchStatus::Match, MatchStatus::Pending]);
        }
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let engine = &services.matches;

        assert!(matches!(
            engine.propose_or_respond(a, a, DesiredStatus::Match).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.propose_or_respond(0, a, DesiredStatus::Match).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.propose_or_respond(a, 404, DesiredStatus::Match).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn record_lookup() {
        let (_dir, db, services) = services();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");

        let outcome = services
            .matches
            .propose_or_respond(a, b, DesiredStatus::Match)
            .await
            .unwrap();
        let record = services.matches.record(outcome.match_id()).await.unwrap();
        assert_eq!((record.initiator, record.counterpart), (a, b));
        assert!(record.involves(b));
        assert!(!record.involves(b + 1));

        assert!(matches!(
            services.matches.record(999).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
