use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::data::error::Error;
use crate::entity::user;
use crate::utils::db::StanderizeError;
use crate::utils::encryption::verify_password;
use crate::AppState;

/// A body that cannot be read as [`LoginBody`] counts as missing credentials.
pub async fn login(
    state: State<Arc<AppState>>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginSuccess>, Error> {
    let Json(data) = body.map_err(|rejection| {
        tracing::debug!("unreadable login body: {}", rejection);
        Error::MissingCredentials
    })?;
    let (Some(username), Some(password)) = (
        data.username.filter(|u| !u.is_empty()),
        data.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(Error::MissingCredentials);
    };

    if let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(&state.db)
        .await
        .warn_err()?
    {
        if !verify_password(
            &password,
            user.salted_password.as_deref(),
            user.salt.as_deref(),
        ) {
            tracing::debug!("wrong password for {}", username);
            return Err(Error::IncorrectUsernameOrPassword);
        }

        return Ok(Json(LoginSuccess {
            message: "Login successful",
            user_id: user.id,
            username: user.username,
            name: user.name,
        }));
    }
    Err(Error::IncorrectUsernameOrPassword)
}

#[derive(Serialize, Debug)]
pub struct LoginSuccess {
    message: &'static str,
    user_id: i32,
    username: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}
