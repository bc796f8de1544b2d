use chrono::{DateTime, Utc};
use pawfectly_types::models::{MatchId, UserId};
use rusqlite::{Connection, params};

use crate::models::{MessageRow, RoomRow};
use crate::{Database, DbError};

impl Database {
    /// Append a message. Match status is not consulted: pending and
    /// unmatched records accept messages too.
    pub fn insert_message(
        &self,
        matches_id: MatchId,
        sender_id: UserId,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<MessageRow, DbError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (matches_id, sender_id, message, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![matches_id, sender_id, message, created_at],
            )?;
            Ok(MessageRow {
                id: conn.last_insert_rowid(),
                matches_id,
                sender_id,
                message: message.to_string(),
                created_at,
            })
        })
    }

    /// `None` when the match does not exist, otherwise its messages oldest
    /// first.
    pub fn get_thread(&self, matches_id: MatchId) -> Result<Option<Vec<MessageRow>>, DbError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM matches WHERE id = ?1)",
                [matches_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(None);
            }
            query_thread(conn, matches_id).map(Some)
        })
    }

    /// `None` when the user does not exist, otherwise one row per match in
    /// status `match` involving the user, each joined to its single latest
    /// message.
    pub fn get_rooms(&self, user_id: UserId) -> Result<Option<Vec<RoomRow>>, DbError> {
        self.with_conn(|conn| {
            if !crate::users::query_user_exists(conn, user_id)? {
                return Ok(None);
            }
            query_rooms(conn, user_id).map(Some)
        })
    }
}

fn query_thread(conn: &Connection, matches_id: MatchId) -> Result<Vec<MessageRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, matches_id, sender_id, message, created_at
         FROM messages
         WHERE matches_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map([matches_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                matches_id: row.get(1)?,
                sender_id: row.get(2)?,
                message: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_rooms(conn: &Connection, user_id: UserId) -> Result<Vec<RoomRow>, DbError> {
    // Correlated top-1 lookup joined on message id: exactly one row per match,
    // even when two messages share a timestamp.
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.age, u.image_pet, m.id, msg.message, msg.created_at
         FROM matches m
         JOIN users u
           ON u.id = CASE WHEN m.userid1 = ?1 THEN m.userid2 ELSE m.userid1 END
         LEFT JOIN messages msg
           ON msg.id = (
               SELECT id FROM messages
               WHERE matches_id = m.id
               ORDER BY created_at DESC, id DESC
               LIMIT 1
           )
         WHERE m.status = 'match'
           AND (m.userid1 = ?1 OR m.userid2 = ?1)
         ORDER BY m.id",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(RoomRow {
                counterpart_id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                image_pet: row.get(3)?,
                matches_id: row.get(4)?,
                last_message: row.get(5)?,
                last_message_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pawfectly_types::models::{DesiredStatus, MatchId};

    use crate::Database;
    use crate::testutil::*;

    fn matched(db: &Database, a: i64, b: i64) -> MatchId {
        db.propose_or_respond(a, b, DesiredStatus::Match, at(0)).unwrap();
        db.propose_or_respond(b, a, DesiredStatus::Match, at(0))
            .unwrap()
            .match_id()
    }

    #[test]
    fn thread_is_ordered_by_timestamp_not_insertion() {
        let (_dir, db) = open_temp();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let m = matched(&db, a, b);

        db.insert_message(m, a, "m1", at(1)).unwrap();
        db.insert_message(m, b, "m2", at(3)).unwrap();
        db.insert_message(m, a, "m3", at(2)).unwrap();

        let bodies: Vec<_> = db
            .get_thread(m)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|row| row.message)
            .collect();
        assert_eq!(bodies, vec!["m1", "m3", "m2"]);
    }

    #[test]
    fn sub_second_timestamps_keep_their_order() {
        let (_dir, db) = open_temp();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let m = matched(&db, a, b);

        for (body, nanos) in [
            ("t_1.5", 500_000_000),
            ("t_1.0", 0),
            ("t_1.123456", 123_456_000),
            ("t_1.000000001", 1),
            ("t_1.9", 900_000_000),
        ] {
            db.insert_message(m, a, body, at(1) + Duration::nanoseconds(nanos))
                .unwrap();
        }

        let bodies: Vec<_> = db
            .get_thread(m)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|row| row.message)
            .collect();
        assert_eq!(
            bodies,
            vec!["t_1.0", "t_1.000000001", "t_1.123456", "t_1.5", "t_1.9"]
        );

        let rooms = db.get_rooms(b).unwrap().unwrap();
        assert_eq!(rooms[0].last_message.as_deref(), Some("t_1.9"));
    }

    #[test]
    fn thread_of_unknown_match_is_none() {
        let (_dir, db) = open_temp();
        assert!(db.get_thread(77).unwrap().is_none());
    }

    #[test]
    fn messages_need_an_existing_match() {
        let (_dir, db) = open_temp();
        let a = user(&db, "a@example.com");

        let err = db.insert_message(77, a, "hello", at(1)).unwrap_err();
        assert!(err.is_foreign_key_violation());
    }

    #[test]
    fn pending_match_accepts_messages() {
        let (_dir, db) = open_temp();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let m = db
            .propose_or_respond(a, b, DesiredStatus::Match, at(0))
            .unwrap()
            .match_id();

        db.insert_message(m, a, "hi?", at(1)).unwrap();
        assert_eq!(db.get_thread(m).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn rooms_show_one_row_per_match_with_latest_message() {
        let (_dir, db) = open_temp();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");
        let c = user(&db, "c@example.com");
        let d = user(&db, "d@example.com");
        let ab = matched(&db, a, b);
        let ac = matched(&db, c, a);
        // pending and unmatch records never show up
        db.propose_or_respond(a, d, DesiredStatus::Match, at(0)).unwrap();

        db.insert_message(ab, a, "first", at(1)).unwrap();
        db.insert_message(ab, b, "latest", at(5)).unwrap();
        db.insert_message(ab, a, "middle", at(3)).unwrap();

        let rooms = db.get_rooms(a).unwrap().unwrap();
        assert_eq!(rooms.len(), 2);

        let with_b = rooms.iter().find(|r| r.matches_id == ab).unwrap();
        assert_eq!(with_b.counterpart_id, b);
        assert_eq!(with_b.last_message.as_deref(), Some("latest"));
        assert_eq!(with_b.last_message_at, Some(at(5)));

        let with_c = rooms.iter().find(|r| r.matches_id == ac).unwrap();
        assert_eq!(with_c.counterpart_id, c);
        assert!(with_c.last_message.is_none());
        assert!(with_c.last_message_at.is_none());

        let for_b = db.get_rooms(b).unwrap().unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].counterpart_id, a);
        assert!(db.get_rooms(d).unwrap().unwrap().is_empty());
    }

    #[test]
    fn rooms_of_unknown_user_is_none() {
        let (_dir, db) = open_temp();
        assert!(db.get_rooms(5).unwrap().is_none());
    }
}
