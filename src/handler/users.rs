use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::alias::canonicalize;
use crate::data::error::Error;
use crate::data::view::{user_views, UserView};
use crate::service::aggregate::{load_one, load_page};
use crate::service::synchronizer::{create_user, delete_user, replace_skills, update_user};
use crate::AppState;

const DEFAULT_LIMIT: u64 = 100;

#[derive(Deserialize, Debug)]
pub struct Pagination {
    skip: Option<u64>,
    limit: Option<u64>,
}

pub async fn list(
    state: State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserView>>, Error> {
    let users = load_page(
        &state.db,
        page.skip.unwrap_or(0),
        page.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .await?;

    Ok(Json(user_views(users)))
}

pub async fn create(
    state: State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<UserView>), Error> {
    let payload = canonicalize(body)?;
    let user = create_user(&state.db, payload).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn retrieve(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<UserView>, Error> {
    Ok(Json(load_one(&state.db, id).await?.into()))
}

/// Full update: the required profile fields must be present.
pub async fn replace(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<UserView>, Error> {
    let payload = canonicalize(body)?;
    if payload.name.is_none() {
        return Err(Error::MissingField("name".to_string()));
    }
    if payload.email.is_none() {
        return Err(Error::MissingField("email".to_string()));
    }

    Ok(Json(update_user(&state.db, id, payload).await?.into()))
}

pub async fn partial_update(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<UserView>, Error> {
    let payload = canonicalize(body)?;

    Ok(Json(update_user(&state.db, id, payload).await?.into()))
}

pub async fn destroy(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, Error> {
    delete_user(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize, Debug)]
pub struct SkillsUpdated {
    message: &'static str,
    user: UserView,
}

/// PUT and PATCH alike: replace whichever of `knownSkills`/`desiredSkills` is present.
pub async fn update_skills(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<SkillsUpdated>, Error> {
    let payload = canonicalize(body)?;
    let user = replace_skills(&state.db, id, payload.known_skills, payload.desired_skills).await?;

    Ok(Json(SkillsUpdated {
        message: "Skills updated successfully",
        user: user.into(),
    }))
}
