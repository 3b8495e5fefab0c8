use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use sea_orm::DatabaseConnection;

pub mod config;
pub mod data;
pub mod entity;
pub mod handler;
pub mod service;
pub mod utils;

use handler::{health, login, search, skills, users};

pub struct AppState {
    pub db: DatabaseConnection,
    /// Normalized by [`config::Config`]: empty or `/segment` without a trailing slash.
    pub api_prefix: String,
}

/// Every endpoint, nested under the state's API prefix, plus the banner at `/`.
pub fn router(state: Arc<AppState>) -> Router {
    let api_prefix = state.api_prefix.clone();
    let api = Router::new()
        .route("/login/", post(login::login))
        .route("/users/", get(users::list).post(users::create))
        .route("/users/by-skill/", get(search::by_skill))
        .route(
            "/users/:id/",
            get(users::retrieve)
                .put(users::replace)
                .patch(users::partial_update)
                .delete(users::destroy),
        )
        .route(
            "/users/:id/skills/",
            put(users::update_skills).patch(users::update_skills),
        )
        .route("/search/", get(search::search))
        .route("/skills/", get(skills::list).post(skills::create))
        .route(
            "/skills/:id/",
            get(skills::retrieve)
                .put(skills::update)
                .patch(skills::update)
                .delete(skills::destroy),
        )
        .route("/health/", get(health::health))
        .route("/debug/skills/", get(health::debug_skills))
        .with_state(state.clone());

    let app = Router::new()
        .route("/", get(health::home))
        .with_state(state);
    if api_prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(&api_prefix, api)
    }
}
