//! The shared, deduplicated set of skill names.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::data::error::Error;
use crate::data::payload::MAX_SKILL_NAME_LENGTH;
use crate::entity::{skill, user_desired_skill, user_known_skill, user_skill};
use crate::utils::db::{StanderizeError, UniqueViolation};

/// Trim, then title-case the first character and lower-case the rest.
/// Blank input yields `None`.
pub fn normalize_skill_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    let mut name = title_case(first);
    name.push_str(&chars.as_str().to_lowercase());
    Some(name)
}

/// Title case of a single character. It differs from upper case for the Latin
/// digraphs, which have their own title forms, and for characters whose upper
/// case expands to several letters (`ß` becomes `Ss`, not `SS`).
fn title_case(c: char) -> String {
    match c {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}'.to_string(),
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}'.to_string(),
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}'.to_string(),
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}'.to_string(),
        _ => {
            let mut upper = c.to_uppercase();
            let mut title: String = upper.next().into_iter().collect();
            title.extend(upper.flat_map(char::to_lowercase));
            title
        }
    }
}

/// Normalize a list of names, dropping blanks and repeats while keeping first-seen order.
pub fn normalize_all<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for name in names.into_iter().filter_map(normalize_skill_name) {
        if !normalized.contains(&name) {
            normalized.push(name);
        }
    }
    normalized
}

/// The legacy comma-separated `skills` text.
pub fn split_legacy_skills(text: &str) -> Vec<String> {
    normalize_all(text.split(','))
}

async fn find_by_name<C>(conn: &C, name: &str) -> Result<Option<skill::Model>, Error>
where
    C: ConnectionTrait,
{
    skill::Entity::find()
        .filter(skill::Column::Name.eq(name))
        .one(conn)
        .await
        .warn_err()
}

/// Fetch the skill with this already-normalized name, inserting it if it is new.
///
/// A concurrent insert of the same name loses quietly on the unique index and
/// the row written by the winner is returned instead.
pub async fn get_or_create<C>(conn: &C, name: &str) -> Result<skill::Model, Error>
where
    C: ConnectionTrait,
{
    if let Some(existing) = find_by_name(conn, name).await? {
        return Ok(existing);
    }

    let inserted = skill::Entity::insert(skill::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_string()),
    })
    .on_conflict(
        OnConflict::column(skill::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await;

    match inserted {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e).warn_err(),
    }

    find_by_name(conn, name).await?.ok_or_else(|| {
        tracing::warn!("skill {} vanished right after get-or-create", name);
        Error::InternalServerError
    })
}

/// Resolve already-normalized names to skill rows, creating what is missing.
pub async fn resolve<C>(conn: &C, names: &[String]) -> Result<Vec<skill::Model>, Error>
where
    C: ConnectionTrait,
{
    let mut skills = Vec::with_capacity(names.len());
    for name in names {
        skills.push(get_or_create(conn, name).await?);
    }
    Ok(skills)
}

fn checked_name(raw: &str) -> Result<String, Error> {
    let name = normalize_skill_name(raw).ok_or_else(|| Error::MissingField("name".to_string()))?;
    if name.chars().count() > MAX_SKILL_NAME_LENGTH {
        return Err(Error::InvalidFields(vec!["name".to_string()]));
    }
    Ok(name)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<skill::Model>, Error> {
    skill::Entity::find()
        .order_by_asc(skill::Column::Name)
        .all(db)
        .await
        .warn_err()
}

pub async fn find<C>(conn: &C, id: i32) -> Result<skill::Model, Error>
where
    C: ConnectionTrait,
{
    skill::Entity::find_by_id(id)
        .one(conn)
        .await
        .warn_err()?
        .ok_or(Error::NotFound)
}

pub async fn create(db: &DatabaseConnection, raw_name: &str) -> Result<skill::Model, Error> {
    let name = checked_name(raw_name)?;
    if find_by_name(db, &name).await?.is_some() {
        return Err(Error::RegisteredSkill);
    }

    skill::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name),
    }
    .insert(db)
    .await
    .unique_err(Error::RegisteredSkill)
}

pub async fn rename(db: &DatabaseConnection, id: i32, raw_name: &str) -> Result<skill::Model, Error> {
    let name = checked_name(raw_name)?;
    let existing = find(db, id).await?;
    if existing.name == name {
        return Ok(existing);
    }
    if find_by_name(db, &name).await?.is_some() {
        return Err(Error::RegisteredSkill);
    }

    let mut skill: skill::ActiveModel = existing.into();
    skill.name = ActiveValue::Set(name);
    skill.update(db).await.unique_err(Error::RegisteredSkill)
}

/// Delete a skill and detach it from every user.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), Error> {
    let txn = db.begin().await.warn_err()?;

    find(&txn, id).await?;
    user_skill::Entity::delete_many()
        .filter(user_skill::Column::SkillId.eq(id))
        .exec(&txn)
        .await
        .warn_err()?;
    user_known_skill::Entity::delete_many()
        .filter(user_known_skill::Column::SkillId.eq(id))
        .exec(&txn)
        .await
        .warn_err()?;
    user_desired_skill::Entity::delete_many()
        .filter(user_desired_skill::Column::SkillId.eq(id))
        .exec(&txn)
        .await
        .warn_err()?;
    skill::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .warn_err()?;

    txn.commit().await.warn_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Python", Some("Python"))]
    #[case(" python ", Some("Python"))]
    #[case("PYTHON", Some("Python"))]
    #[case("machine LEARNING", Some("Machine learning"))]
    #[case("c++", Some("C++"))]
    #[case("ßql", Some("Ssql"))]
    #[case("ǆava", Some("ǅava"))]
    #[case("ÉLIXIR", Some("Élixir"))]
    #[case("   ", None)]
    #[case("", None)]
    fn normalizes_like_capitalize(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_skill_name(raw).as_deref(), expected);
    }

    #[test]
    fn normalize_all_dedupes_in_order() {
        assert_eq!(
            normalize_all(["rust", " Go", "RUST", "", "go "]),
            vec!["Rust".to_string(), "Go".to_string()]
        );
    }

    #[test]
    fn legacy_text_is_comma_separated() {
        assert_eq!(
            split_legacy_skills("python, Django ,,react"),
            vec!["Python".to_string(), "Django".to_string(), "React".to_string()]
        );
    }
}
