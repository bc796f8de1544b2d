use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use pawfectly_types::api::{Claims, UserQuery};
use pawfectly_types::models::Candidate;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::ensure_actor;
use crate::params::required_id;

/// GET /api/pets?id= : the requesting user's candidate feed.
pub async fn pets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiError>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let user_id = required_id(query.id.as_deref(), "id")?;
    ensure_actor(&claims, user_id)?;

    Ok(Json(state.services.feed.candidates(user_id).await?))
}
