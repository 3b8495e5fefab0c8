//! Create/update contract between an inbound user payload and the stored aggregate.
//!
//! Every call runs in a single transaction: either the user row, all three
//! associations and the experiences change together, or nothing does.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, SqlErr, TransactionTrait,
};
use validator::Validate;

use crate::data::alias::invalid_fields;
use crate::data::error::Error;
use crate::data::payload::{ExperiencePayload, Field, NewExperience, UserPayload};
use crate::entity::{hackathon_experience, user};
use crate::service::aggregate::{load_one, UserAggregate};
use crate::service::association::{AssociationPlan, ALL_SKILL_SETS};
use crate::utils::db::StanderizeError;
use crate::utils::encryption::hash_password;

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingField(field.to_string()))
}

fn narrow_year(year: Field<i32>) -> Result<Field<i16>, Error> {
    match year {
        Field::Unset => Ok(Field::Unset),
        Field::Clear => Ok(Field::Clear),
        Field::Value(year) => i16::try_from(year)
            .map(Field::Value)
            .map_err(|_| Error::InvalidFields(vec!["year".to_string()])),
    }
}

pub fn accepted_experiences(entries: &[ExperiencePayload]) -> Vec<NewExperience> {
    let accepted: Vec<NewExperience> = entries
        .iter()
        .filter_map(ExperiencePayload::accepted)
        .collect();
    if accepted.len() < entries.len() {
        tracing::debug!(
            "dropped {} hackathon experiences without organizer or hackathon name",
            entries.len() - accepted.len()
        );
    }
    accepted
}

fn user_conflict(e: DbErr) -> Error {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("username") => {
            Error::RegisteredUsername
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::RegisteredEmail,
        _ => {
            tracing::warn!("{}", e);
            Error::InternalServerError
        }
    }
}

async fn ensure_username_free<C>(conn: &C, username: &str) -> Result<(), Error>
where
    C: ConnectionTrait,
{
    let taken = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(conn)
        .await
        .warn_err()?
        .is_some();

    if taken {
        return Err(Error::RegisteredUsername);
    }
    Ok(())
}

async fn ensure_email_free<C>(conn: &C, email: &str, except: Option<i32>) -> Result<(), Error>
where
    C: ConnectionTrait,
{
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }

    if query.one(conn).await.warn_err()?.is_some() {
        return Err(Error::RegisteredEmail);
    }
    Ok(())
}

async fn insert_experiences<C>(
    conn: &C,
    user_id: i32,
    experiences: Vec<NewExperience>,
) -> Result<(), Error>
where
    C: ConnectionTrait,
{
    for experience in experiences {
        hackathon_experience::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            organizer_name: ActiveValue::Set(experience.organizer_name),
            hackathon_name: ActiveValue::Set(experience.hackathon_name),
            description: ActiveValue::Set(experience.description),
            achievements: ActiveValue::Set(experience.achievements),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(conn)
        .await
        .warn_err()?;
    }
    Ok(())
}

async fn delete_experiences<C>(conn: &C, user_id: i32) -> Result<(), Error>
where
    C: ConnectionTrait,
{
    hackathon_experience::Entity::delete_many()
        .filter(hackathon_experience::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .warn_err()?;
    Ok(())
}

/// Register a new user with its skills and hackathon experiences.
pub async fn create_user(
    db: &DatabaseConnection,
    payload: UserPayload,
) -> Result<UserAggregate, Error> {
    let plan = AssociationPlan::for_create(&payload);
    let experiences =
        accepted_experiences(payload.hackathon_experiences.as_deref().unwrap_or_default());
    let year = narrow_year(payload.year)?;

    let username = required(payload.username, "username")?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::MissingField("password".to_string()))?;
    let name = required(payload.name, "name")?;
    let email = required(payload.email, "email")?;

    let txn = db.begin().await.warn_err()?;

    ensure_username_free(&txn, &username).await?;
    ensure_email_free(&txn, &email, None).await?;

    let (salted_password, salt) = hash_password(&password);
    let now = Utc::now();
    let user = user::ActiveModel {
        id: ActiveValue::NotSet,
        username: ActiveValue::Set(Some(username)),
        salted_password: ActiveValue::Set(Some(salted_password)),
        salt: ActiveValue::Set(Some(salt)),
        name: ActiveValue::Set(name),
        college_name: ActiveValue::Set(payload.college_name.trimmed().into_option()),
        year: ActiveValue::Set(year.into_option()),
        email: ActiveValue::Set(email),
        gender: ActiveValue::Set(payload.gender.into_option()),
        linkedin_url: ActiveValue::Set(payload.linkedin_url.trimmed().into_option()),
        github_url: ActiveValue::Set(payload.github_url.trimmed().into_option()),
        is_beginner: ActiveValue::Set(payload.is_beginner.unwrap_or(false)),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(&txn)
    .await
    .map_err(user_conflict)?;

    plan.apply(&txn, user.id).await?;
    insert_experiences(&txn, user.id, experiences).await?;

    let aggregate = load_one(&txn, user.id).await?;
    txn.commit().await.warn_err()?;

    tracing::info!("created user {}", aggregate.user.id);
    Ok(aggregate)
}

/// Apply a partial payload. Absent fields stay as they are; supplied skill
/// lists and experience lists replace what is stored.
pub async fn update_user(
    db: &DatabaseConnection,
    id: i32,
    payload: UserPayload,
) -> Result<UserAggregate, Error> {
    let plan = AssociationPlan::for_update(
        payload.known_skills.as_deref(),
        payload.desired_skills.as_deref(),
    );
    let experiences = payload
        .hackathon_experiences
        .as_deref()
        .map(accepted_experiences);
    let year = narrow_year(payload.year)?;
    let name = payload.name.map(|n| required(Some(n), "name")).transpose()?;
    let email = payload
        .email
        .map(|e| required(Some(e), "email"))
        .transpose()?;

    let txn = db.begin().await.warn_err()?;

    let existing = user::Entity::find_by_id(id)
        .one(&txn)
        .await
        .warn_err()?
        .ok_or(Error::NotFound)?;

    if payload.username.is_some() {
        tracing::debug!("ignoring username in update of user {}", id);
    }
    if let Some(email) = &email {
        ensure_email_free(&txn, email, Some(id)).await?;
    }

    let college_name = payload.college_name.trimmed().apply(existing.college_name.clone());
    let year = year.apply(existing.year);
    let gender = payload.gender.apply(existing.gender);
    let linkedin_url = payload.linkedin_url.trimmed().apply(existing.linkedin_url.clone());
    let github_url = payload.github_url.trimmed().apply(existing.github_url.clone());

    let mut user: user::ActiveModel = existing.into();
    if let Some(name) = name {
        user.name = ActiveValue::Set(name);
    }
    if let Some(email) = email {
        user.email = ActiveValue::Set(email);
    }
    user.college_name = ActiveValue::Set(college_name);
    user.year = ActiveValue::Set(year);
    user.gender = ActiveValue::Set(gender);
    user.linkedin_url = ActiveValue::Set(linkedin_url);
    user.github_url = ActiveValue::Set(github_url);
    if let Some(is_beginner) = payload.is_beginner {
        user.is_beginner = ActiveValue::Set(is_beginner);
    }
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        let (salted_password, salt) = hash_password(&password);
        user.salted_password = ActiveValue::Set(Some(salted_password));
        user.salt = ActiveValue::Set(Some(salt));
    }
    user.updated_at = ActiveValue::Set(Utc::now());
    user.update(&txn).await.map_err(user_conflict)?;

    plan.apply(&txn, id).await?;
    if let Some(experiences) = experiences {
        delete_experiences(&txn, id).await?;
        insert_experiences(&txn, id, experiences).await?;
    }

    let aggregate = load_one(&txn, id).await?;
    txn.commit().await.warn_err()?;

    tracing::info!("updated user {}", id);
    Ok(aggregate)
}

/// Replace whichever of the known/desired lists are supplied.
pub async fn replace_skills(
    db: &DatabaseConnection,
    id: i32,
    known_skills: Option<Vec<String>>,
    desired_skills: Option<Vec<String>>,
) -> Result<UserAggregate, Error> {
    let payload = UserPayload {
        known_skills,
        desired_skills,
        ..Default::default()
    };
    payload.validate().map_err(invalid_fields)?;

    update_user(db, id, payload).await
}

/// Delete a user along with its association rows and experiences.
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), Error> {
    let txn = db.begin().await.warn_err()?;

    user::Entity::find_by_id(id)
        .one(&txn)
        .await
        .warn_err()?
        .ok_or(Error::NotFound)?;

    for set in ALL_SKILL_SETS {
        set.clear(&txn, id).await?;
    }
    delete_experiences(&txn, id).await?;
    user::Entity::delete_by_id(id).exec(&txn).await.warn_err()?;

    txn.commit().await.warn_err()?;

    tracing::info!("deleted user {}", id);
    Ok(())
}
