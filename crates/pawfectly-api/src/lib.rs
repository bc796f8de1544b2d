pub mod auth;
pub mod error;
pub mod feed;
pub mod matches;
pub mod messages;
pub mod middleware;
pub mod params;
pub mod profiles;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};

use pawfectly_core::Services;
use pawfectly_db::Database;
use pawfectly_types::api::StatusMessage;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub services: Services,
    pub jwt_secret: String,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, jwt_secret: String) -> AppState {
        Arc::new(Self {
            services: Services::new(db),
            jwt_secret,
        })
    }
}

/// All routes, with auth applied to everything except signup, login and
/// health. Cross-origin and tracing layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/api/getProfile", get(profiles::get_profile))
        .route("/api/setPetType", post(profiles::set_pet_type))
        .route("/api/setProfile", post(profiles::set_profile))
        .route("/api/deleteProfile", delete(profiles::delete_profile))
        .route("/api/setMatch", post(matches::set_match))
        .route("/api/pets", get(feed::pets))
        .route("/api/sendMessage", post(messages::send_message))
        .route("/api/messages", get(messages::get_thread))
        .route("/api/listRoom", get(messages::list_rooms))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "ok".into(),
    })
}
