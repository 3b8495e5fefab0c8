//! Filtering users by skill and beginner status.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::data::error::Error;
use crate::entity::user;
use crate::service::aggregate::{load_many, natural_order, UserAggregate};
use crate::service::association::SkillSet;
use crate::service::skill_registry::{normalize_all, normalize_skill_name};
use crate::utils::db::StanderizeError;

/// Associations that count as "having" a skill when searching.
const SEARCHED_SETS: [SkillSet; 2] = [SkillSet::Known, SkillSet::General];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Normalized, distinct skill names; all must match.
    pub skills: Vec<String>,
    pub include_beginner: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            skills: Vec::new(),
            include_beginner: true,
        }
    }
}

impl SearchQuery {
    /// Build from the raw `skills` and `include_beginner` query parameters.
    /// Beginners are included unless the flag is anything other than "true".
    /// Names are normalized like stored skills, which makes matching case-insensitive.
    pub fn parse(skills: Option<&str>, include_beginner: Option<&str>) -> Self {
        SearchQuery {
            skills: normalize_all(skills.unwrap_or_default().split(',')),
            include_beginner: include_beginner
                .map_or(true, |flag| flag.trim().eq_ignore_ascii_case("true")),
        }
    }

    /// One `any` group per skill (known or general), all groups required.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        for name in &self.skills {
            condition = condition.add(skill_condition(name));
        }
        if !self.include_beginner {
            condition = condition.add(user::Column::IsBeginner.eq(false));
        }
        condition
    }
}

fn skill_condition(name: &str) -> Condition {
    SEARCHED_SETS.iter().fold(Condition::any(), |any, set| {
        any.add(user::Column::Id.in_subquery(set.holders_of(name)))
    })
}

/// Users satisfying `query`, each at most once, newest first.
pub async fn search_users<C>(conn: &C, query: &SearchQuery) -> Result<Vec<UserAggregate>, Error>
where
    C: ConnectionTrait,
{
    let initial_count = user::Entity::find().count(conn).await.warn_err()?;
    tracing::info!(
        "search: skills={:?} include_beginner={} over {} users",
        query.skills,
        query.include_beginner,
        initial_count
    );

    // membership is tested through subqueries, so no join can repeat a user
    let users = natural_order(user::Entity::find().filter(query.condition()))
        .all(conn)
        .await
        .warn_err()?;
    tracing::info!("search: {} users found", users.len());

    load_many(conn, users).await
}

/// Users holding one skill in their known or general set; nobody when the name is blank.
pub async fn users_with_skill<C>(conn: &C, skill: Option<&str>) -> Result<Vec<UserAggregate>, Error>
where
    C: ConnectionTrait,
{
    let Some(name) = skill.and_then(normalize_skill_name) else {
        return Ok(Vec::new());
    };

    let users = natural_order(user::Entity::find().filter(skill_condition(&name)))
        .all(conn)
        .await
        .warn_err()?;

    load_many(conn, users).await
}
