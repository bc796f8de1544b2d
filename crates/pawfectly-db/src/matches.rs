use chrono::{DateTime, Utc};
use pawfectly_types::models::{DesiredStatus, MatchId, ProposalOutcome, UserId};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::debug;

use crate::models::MatchRow;
use crate::{Database, DbError};

impl Database {
    /// Apply one step of the pairwise match state machine for `actor`
    /// acting on `other`.
    ///
    /// The lookup and the write share one IMMEDIATE transaction on the
    /// writer connection, so the write lock is held before the current
    /// status is read. The transition itself is a compare-and-swap on
    /// `status = 'pending'`, and the unique pair index rejects a second row
    /// for the same pair even if another process writes to the file.
    pub fn propose_or_respond(
        &self,
        actor: UserId,
        other: UserId,
        desired: DesiredStatus,
        now: DateTime<Utc>,
    ) -> Result<ProposalOutcome, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let outcome = match query_match_between(&tx, actor, other)? {
                None => {
                    let status = desired.initial_status();
                    tx.execute(
                        "INSERT INTO matches (userid1, userid2, status, created_at)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![actor, other, status.as_str(), now],
                    )?;
                    ProposalOutcome::Created {
                        match_id: tx.last_insert_rowid(),
                        status,
                    }
                }
                Some(row) if !row.status.is_terminal() => {
                    let status = desired.resolved_status();
                    // The responder becomes the initiator of record.
                    let updated = tx.execute(
                        "UPDATE matches SET status = ?1, userid1 = ?2, userid2 = ?3
                         WHERE id = ?4 AND status = 'pending'",
                        params![status.as_str(), actor, other, row.id],
                    )?;
                    if updated == 1 {
                        ProposalOutcome::Transitioned {
                            match_id: row.id,
                            status,
                        }
                    } else {
                        ProposalOutcome::Unchanged
                    }
                }
                Some(row) => {
                    debug!(
                        "Match {} between {} and {} already {}, ignoring {}",
                        row.id, actor, other, row.status, desired
                    );
                    ProposalOutcome::Unchanged
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
    }

    pub fn get_match(&self, id: MatchId) -> Result<Option<MatchRow>, DbError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, userid1, userid2, status, created_at FROM matches WHERE id = ?1",
                    [id],
                    map_match_row,
                )
                .optional()?)
        })
    }

    /// The record for the unordered pair `{a, b}`, whichever side created it.
    pub fn get_match_between(&self, a: UserId, b: UserId) -> Result<Option<MatchRow>, DbError> {
        self.with_conn(|conn| query_match_between(conn, a, b))
    }
}

/// Looks the pair up through the normalized key so the unique index serves
/// the query.
fn query_match_between(conn: &Connection, a: UserId, b: UserId) -> Result<Option<MatchRow>, DbError> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Ok(conn
        .query_row(
            "SELECT id, userid1, userid2, status, created_at FROM matches
             WHERE min(userid1, userid2) = ?1 AND max(userid1, userid2) = ?2",
            params![lo, hi],
            map_match_row,
        )
        .optional()?)
}

fn map_match_row(row: &Row<'_>) -> rusqlite::Result<MatchRow> {
    let status: String = row.get(3)?;
    Ok(MatchRow {
        id: row.get(0)?,
        userid1: row.get(1)?,
        userid2: row.get(2)?,
        status: status
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        created_at: row.get(4)?,
    })
}
