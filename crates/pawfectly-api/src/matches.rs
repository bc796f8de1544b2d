use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use pawfectly_types::api::{Claims, SetMatchQuery, SetMatchResponse};
use pawfectly_types::models::DesiredStatus;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::ensure_actor;
use crate::params::{required_id, required_text};

/// POST /api/setMatch?userid1=&userid2=&status=
///
/// `userid1` is the acting user. An empty `status` with `matchesId: 0` in
/// the response means the pair was already resolved and nothing changed.
pub async fn set_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Query(query), _): WithRejection<Query<SetMatchQuery>, ApiError>,
) -> Result<Json<SetMatchResponse>, ApiError> {
    let actor = required_id(query.userid1.as_deref(), "userid1")?;
    let other = required_id(query.userid2.as_deref(), "userid2")?;
    let desired: DesiredStatus = required_text(query.status.as_deref(), "status")?
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("status must be 'match' or 'unmatch': {e}")))?;
    ensure_actor(&claims, actor)?;

    let outcome = state
        .services
        .matches
        .propose_or_respond(actor, other, desired)
        .await?;

    Ok(Json(SetMatchResponse {
        message: "Match successfully processed".into(),
        status: outcome
            .status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        matches_id: outcome.match_id(),
    }))
}
