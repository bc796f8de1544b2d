use rusqlite::Connection;
use tracing::info;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, matches, messages)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                pet_type    TEXT,
                image_pet   TEXT,
                pet_breeds  TEXT,
                gender      TEXT,
                name        TEXT,
                age         INTEGER,
                city        TEXT,
                bio         TEXT,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE matches (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                userid1     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                userid2     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status      TEXT NOT NULL CHECK (status IN ('pending', 'match', 'unmatch')),
                created_at  TEXT NOT NULL,
                CHECK (userid1 <> userid2)
            );

            -- One row per unordered pair: (A, B) and (B, A) collide here.
            CREATE UNIQUE INDEX idx_matches_pair
                ON matches(min(userid1, userid2), max(userid1, userid2));

            CREATE INDEX idx_matches_userid2 ON matches(userid2);

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                matches_id  INTEGER NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
                sender_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_messages_match ON messages(matches_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
