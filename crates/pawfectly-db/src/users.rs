use chrono::{DateTime, Utc};
use pawfectly_types::models::UserId;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{ProfileUpdate, UserRow};
use crate::{Database, DbError};

pub(crate) const USER_COLUMNS: &str =
    "id, email, password, pet_type, image_pet, pet_breeds, gender, name, age, city, bio, created_at";

impl Database {
    /// Insert a bare account and return its id. Profile fields stay NULL
    /// until the user fills them in.
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<UserId, DbError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (email, password, created_at) VALUES (?1, ?2, ?3)",
                params![email, password_hash, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
            Ok(conn.query_row(&sql, [email], map_user_row).optional()?)
        })
    }

    pub fn get_user_by_id(&self, id: UserId) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn user_exists(&self, id: UserId) -> Result<bool, DbError> {
        self.with_conn(|conn| query_user_exists(conn, id))
    }

    /// Returns false when no such user exists.
    pub fn set_pet_type(&self, id: UserId, pet_type: &str) -> Result<bool, DbError> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE users SET pet_type = ?1 WHERE id = ?2",
                params![pet_type, id],
            )?;
            Ok(updated > 0)
        })
    }

    /// Returns false when no such user exists.
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<bool, DbError> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE users
                 SET pet_breeds = ?1, gender = ?2, name = ?3, age = ?4, city = ?5, bio = ?6,
                     image_pet = COALESCE(NULLIF(?7, ''), image_pet)
                 WHERE id = ?8",
                params![
                    update.pet_breeds,
                    update.gender,
                    update.name,
                    update.age,
                    update.city,
                    update.bio,
                    update.image,
                    update.id,
                ],
            )?;
            Ok(updated > 0)
        })
    }

    /// Deletes the account; its match records and messages go with it.
    pub fn delete_user(&self, id: UserId) -> Result<bool, DbError> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<UserRow>, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_user_row).optional()?)
}

pub(crate) fn query_user_exists(conn: &Connection, id: UserId) -> Result<bool, DbError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?)
}

/// Expects the columns in `USER_COLUMNS` order.
pub(crate) fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        pet_type: row.get(3)?,
        image_pet: row.get(4)?,
        pet_breeds: row.get(5)?,
        gender: row.get(6)?,
        name: row.get(7)?,
        age: row.get(8)?,
        city: row.get(9)?,
        bio: row.get(10)?,
        created_at: row.get(11)?,
    })
}
