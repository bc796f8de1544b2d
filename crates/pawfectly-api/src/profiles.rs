use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use pawfectly_core::profiles::ProfileUpdate;
use pawfectly_types::api::{
    Claims, ProfileUpdatedResponse, SetPetTypeRequest, SetProfileRequest, StatusMessage, UserQuery,
};
use pawfectly_types::models::Profile;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::ensure_actor;
use crate::params::required_id;

/// Any signed-in user may view any profile; candidates link here.
pub async fn get_profile(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiError>,
) -> Result<Json<Profile>, ApiError> {
    let user_id = required_id(query.id.as_deref(), "id")?;
    Ok(Json(state.services.profiles.profile(user_id).await?))
}

pub async fn set_pet_type(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<SetPetTypeRequest>, ApiError>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    ensure_actor(&claims, req.id)?;
    state.services.profiles.set_pet_type(req.id, req.pet_type).await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Set PetType successfully".into(),
        user_id: req.id,
    }))
}

pub async fn set_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<SetProfileRequest>, ApiError>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    ensure_actor(&claims, req.id)?;
    let user_id = req.id;

    state
        .services
        .profiles
        .update_profile(ProfileUpdate {
            id: req.id,
            pet_breeds: req.pet_breeds,
            gender: req.gender,
            name: req.name,
            age: i64::from(req.age),
            city: req.city,
            bio: req.bio,
            image: req.image,
        })
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".into(),
        user_id,
    }))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiError>,
) -> Result<Json<StatusMessage>, ApiError> {
    let user_id = required_id(query.id.as_deref(), "id")?;
    ensure_actor(&claims, user_id)?;
    state.services.profiles.delete(user_id).await?;

    Ok(Json(StatusMessage {
        message: "User deleted successfully".into(),
    }))
}
