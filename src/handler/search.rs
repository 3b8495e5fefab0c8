use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::data::error::Error;
use crate::data::view::{user_views, UserView};
use crate::service::search::{search_users, users_with_skill, SearchQuery};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    skills: Option<String>,
    include_beginner: Option<String>,
    /// Accepted for the frontend's sake; it does not narrow the result.
    team_size: Option<String>,
}

pub async fn search(
    state: State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserView>>, Error> {
    if let Some(team_size) = &params.team_size {
        tracing::debug!("search ignores team_size={}", team_size);
    }
    let query = SearchQuery::parse(params.skills.as_deref(), params.include_beginner.as_deref());
    let users = search_users(&state.db, &query).await?;

    Ok(Json(user_views(users)))
}

#[derive(Deserialize, Debug)]
pub struct SkillParam {
    skill: Option<String>,
}

pub async fn by_skill(
    state: State<Arc<AppState>>,
    Query(params): Query<SkillParam>,
) -> Result<Json<Vec<UserView>>, Error> {
    let users = users_with_skill(&state.db, params.skill.as_deref()).await?;

    Ok(Json(user_views(users)))
}
