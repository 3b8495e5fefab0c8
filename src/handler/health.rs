use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use sea_orm::{EntityTrait, ModelTrait, QueryOrder};
use serde::Serialize;
use serde_json::{json, Value};

use crate::data::error::Error;
use crate::data::view::SkillView;
use crate::entity::user::KnownSkills;
use crate::entity::{skill, user};
use crate::service::skill_registry;
use crate::utils::db::StanderizeError;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn home(state: State<Arc<AppState>>) -> Json<Value> {
    let prefix = &state.api_prefix;
    Json(json!({
        "message": "ByteBrigade Backend API is running!",
        "endpoints": {
            "health": format!("{}/health/", prefix),
            "login": format!("{}/login/", prefix),
            "users": format!("{}/users/", prefix),
            "search": format!("{}/search/", prefix),
            "skills": format!("{}/skills/", prefix)
        },
        "status": "online",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Serialize, Debug)]
pub struct UserSkills {
    id: i32,
    name: String,
    skills: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct SkillsOverview {
    total_skills: usize,
    total_users: usize,
    all_skills: Vec<SkillView>,
    users_with_skills: Vec<UserSkills>,
}

pub async fn debug_skills(state: State<Arc<AppState>>) -> Result<Json<SkillsOverview>, Error> {
    let all_skills = skill_registry::list(&state.db).await?;
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await
        .warn_err()?;

    let mut users_with_skills = Vec::with_capacity(users.len());
    for user in users {
        let skills = user
            .find_linked(KnownSkills)
            .order_by_asc(skill::Column::Name)
            .all(&state.db)
            .await
            .warn_err()?;
        users_with_skills.push(UserSkills {
            id: user.id,
            name: user.name,
            skills: skills.into_iter().map(|s| s.name).collect(),
        });
    }

    Ok(Json(SkillsOverview {
        total_skills: all_skills.len(),
        total_users: users_with_skills.len(),
        all_skills: all_skills.into_iter().map(Into::into).collect(),
        users_with_skills,
    }))
}
