use pawfectly_types::models::UserId;

use crate::models::UserRow;
use crate::users::{USER_COLUMNS, map_user_row};
use crate::{Database, DbError};

impl Database {
    /// Users `user_id` may still be shown, in ascending id order.
    ///
    /// A user C is hidden when `user_id` already acted on C (a record with
    /// `user_id` as initiator, any status), or when C resolved a record
    /// toward `user_id` (C as initiator, status match or unmatch). A pending
    /// proposal from C does not hide C.
    pub fn get_candidates(&self, user_id: UserId) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS}
                 FROM users u
                 WHERE u.id <> ?1
                   AND NOT EXISTS (
                       SELECT 1 FROM matches m
                       WHERE (m.userid1 = ?1 AND m.userid2 = u.id)
                          OR (m.userid1 = u.id AND m.userid2 = ?1
                              AND m.status IN ('match', 'unmatch'))
                   )
                 ORDER BY u.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], map_user_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
