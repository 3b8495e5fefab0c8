use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::data::error::Error;
use crate::data::view::SkillView;
use crate::service::skill_registry;
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct SkillBody {
    name: Option<String>,
}

impl SkillBody {
    fn name(&self) -> Result<&str, Error> {
        self.name
            .as_deref()
            .ok_or_else(|| Error::MissingField("name".to_string()))
    }
}

pub async fn list(state: State<Arc<AppState>>) -> Result<Json<Vec<SkillView>>, Error> {
    let skills = skill_registry::list(&state.db).await?;

    Ok(Json(skills.into_iter().map(Into::into).collect()))
}

pub async fn create(
    state: State<Arc<AppState>>,
    Json(body): Json<SkillBody>,
) -> Result<(StatusCode, Json<SkillView>), Error> {
    let skill = skill_registry::create(&state.db, body.name()?).await?;

    Ok((StatusCode::CREATED, Json(skill.into())))
}

pub async fn retrieve(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SkillView>, Error> {
    Ok(Json(skill_registry::find(&state.db, id).await?.into()))
}

/// PUT and PATCH: the only writable attribute is the name; without one nothing changes.
pub async fn update(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<SkillBody>,
) -> Result<Json<SkillView>, Error> {
    let skill = match body.name.as_deref() {
        Some(name) => skill_registry::rename(&state.db, id, name).await?,
        None => skill_registry::find(&state.db, id).await?,
    };

    Ok(Json(skill.into()))
}

pub async fn destroy(
    state: State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, Error> {
    skill_registry::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
