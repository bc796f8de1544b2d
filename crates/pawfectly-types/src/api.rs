use serde::{Deserialize, Serialize};

use crate::models::{MatchId, UserId};

// -- JWT Claims --

/// Claims carried by the bearer token issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user_id: UserId,
    pub pet_type: Option<String>,
    pub image: Option<String>,
    pub token: String,
}

// -- Profiles --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetPetTypeRequest {
    pub id: UserId,
    pub pet_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetProfileRequest {
    pub id: UserId,
    pub pet_breeds: String,
    pub gender: String,
    pub name: String,
    pub age: u32,
    pub city: String,
    pub bio: String,
    /// Reference to an already stored image. Absent or empty keeps the
    /// current one.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user_id: UserId,
}

/// Query string naming a single user, e.g. `?id=12`. Kept as raw text so
/// the handler can report exactly which parameter is missing or malformed.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: Option<String>,
}

// -- Matches --

#[derive(Debug, Deserialize)]
pub struct SetMatchQuery {
    pub userid1: Option<String>,
    pub userid2: Option<String>,
    pub status: Option<String>,
}

/// `status` is empty and `matches_id` is 0 when the pair was already
/// resolved and nothing changed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMatchResponse {
    pub message: String,
    pub status: String,
    pub matches_id: MatchId,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub message: String,
    pub matches_id: MatchId,
    pub sender_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub sender_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    #[serde(rename = "matchesId")]
    pub matches_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

/// Envelope used by the thread and room-list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesEnvelope<T> {
    pub messages: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}
