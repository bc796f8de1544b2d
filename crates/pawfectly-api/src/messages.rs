use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use pawfectly_types::api::{
    Claims, MessagesEnvelope, RoomsQuery, SendMessageRequest, SendMessageResponse, ThreadQuery,
};
use pawfectly_types::models::{Room, ThreadMessage};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::ensure_actor;
use crate::params::required_id;

/// The sender must be the caller. Whether the caller belongs to the match,
/// and whether the match is still active, is not checked.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<SendMessageRequest>, ApiError>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    ensure_actor(&claims, req.sender_id)?;

    let stored = state
        .services
        .conversations
        .append(req.matches_id, req.sender_id, req.message)
        .await?;

    Ok(Json(SendMessageResponse {
        message: stored.body,
        sender_id: stored.sender_id,
    }))
}

/// GET /api/messages?matchesId= : only the two participants may read.
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Query(query), _): WithRejection<Query<ThreadQuery>, ApiError>,
) -> Result<Json<MessagesEnvelope<ThreadMessage>>, ApiError> {
    let match_id = required_id(query.matches_id.as_deref(), "matchesId")?;

    let record = state.services.matches.record(match_id).await?;
    if !record.involves(claims.sub) {
        return Err(ApiError::Forbidden("not a participant of this match".into()));
    }

    let messages = state.services.conversations.thread(match_id).await?;
    Ok(Json(MessagesEnvelope { messages }))
}

/// GET /api/listRoom?userID=
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Query(query), _): WithRejection<Query<RoomsQuery>, ApiError>,
) -> Result<Json<MessagesEnvelope<Room>>, ApiError> {
    let user_id = required_id(query.user_id.as_deref(), "userID")?;
    ensure_actor(&claims, user_id)?;

    let messages = state.services.conversations.rooms(user_id).await?;
    Ok(Json(MessagesEnvelope { messages }))
}
