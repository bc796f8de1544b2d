//! Database row types. These map directly to SQLite rows; conversions into
//! the shared models live here so callers never see the password column by
//! accident.
use chrono::{DateTime, Utc};
use pawfectly_types::models::{
    Candidate, MatchId, MatchRecord, MatchStatus, Profile, Room, ThreadMessage, UserId,
};

#[derive(Debug)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub pet_type: Option<String>,
    pub image_pet: Option<String>,
    pub pet_breeds: Option<String>,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            pet_type: self.pet_type,
            image: self.image_pet,
            pet_breeds: self.pet_breeds,
            gender: self.gender,
            name: self.name,
            age: self.age,
            city: self.city,
            bio: self.bio,
        }
    }

    pub fn into_candidate(self) -> Candidate {
        Candidate {
            id: self.id,
            pet_type: self.pet_type,
            name: self.name,
            gender: self.gender,
            age: self.age,
            pet_breeds: self.pet_breeds,
            image: self.image_pet,
            city: self.city,
            bio: self.bio,
        }
    }
}

/// Fields written by a profile update. An empty or absent `image` keeps
/// the stored reference.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub id: UserId,
    pub pet_breeds: String,
    pub gender: String,
    pub name: String,
    pub age: i64,
    pub city: String,
    pub bio: String,
    pub image: Option<String>,
}

#[derive(Debug)]
pub struct MatchRow {
    pub id: MatchId,
    pub userid1: UserId,
    pub userid2: UserId,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl From<MatchRow> for MatchRecord {
    fn from(row: MatchRow) -> Self {
        MatchRecord {
            id: row.id,
            initiator: row.userid1,
            counterpart: row.userid2,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
pub struct MessageRow {
    pub id: i64,
    pub matches_id: MatchId,
    pub sender_id: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for ThreadMessage {
    fn from(row: MessageRow) -> Self {
        ThreadMessage {
            id: row.id,
            body: row.message,
            sender_id: row.sender_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
pub struct RoomRow {
    pub counterpart_id: UserId,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub image_pet: Option<String>,
    pub matches_id: MatchId,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            counterpart_id: row.counterpart_id,
            counterpart_name: row.name,
            counterpart_age: row.age,
            match_id: row.matches_id,
            profile_pic: row.image_pet,
            last_message: row.last_message,
            last_message_time: row.last_message_at,
        }
    }
}
