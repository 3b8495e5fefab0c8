//! The three user → skill associations and the plan that rewrites them.
//!
//! Known skills are mirrored into the general (`my_skills`) set. That step is
//! [`AssociationPlan::mirror_known_into_general`], applied while the plan is
//! built, so the invariant can be checked without a database.

use sea_orm::sea_query::{Expr, OnConflict, Query, SelectStatement};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::data::error::Error;
use crate::data::payload::UserPayload;
use crate::entity::skill;
use crate::service::skill_registry::{self, normalize_all, split_legacy_skills};
use crate::utils::db::StanderizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillSet {
    /// `my_skills`
    General,
    Known,
    Desired,
}

pub const ALL_SKILL_SETS: [SkillSet; 3] = [SkillSet::General, SkillSet::Known, SkillSet::Desired];

/// Run `$body` with the junction entity and its two columns bound for `$set`.
macro_rules! with_junction {
    ($set:expr, |$entity:ident, $user:ident, $skill:ident| $body:expr) => {
        match $set {
            SkillSet::General => {
                use crate::entity::user_skill as junction;
                let ($entity, $user, $skill) = (
                    junction::Entity,
                    junction::Column::UserId,
                    junction::Column::SkillId,
                );
                $body
            }
            SkillSet::Known => {
                use crate::entity::user_known_skill as junction;
                let ($entity, $user, $skill) = (
                    junction::Entity,
                    junction::Column::UserId,
                    junction::Column::SkillId,
                );
                $body
            }
            SkillSet::Desired => {
                use crate::entity::user_desired_skill as junction;
                let ($entity, $user, $skill) = (
                    junction::Entity,
                    junction::Column::UserId,
                    junction::Column::SkillId,
                );
                $body
            }
        }
    };
}

impl SkillSet {
    pub async fn clear<C>(self, conn: &C, user_id: i32) -> Result<(), Error>
    where
        C: ConnectionTrait,
    {
        with_junction!(self, |entity, user_col, _skill_col| {
            clear_links(conn, entity, user_col, user_id).await
        })
    }

    /// Link a skill to the user; linking twice is a no-op.
    pub async fn attach<C>(self, conn: &C, user_id: i32, skill_id: i32) -> Result<(), Error>
    where
        C: ConnectionTrait,
    {
        let mut insert = Query::insert();
        with_junction!(self, |entity, user_col, skill_col| {
            insert
                .into_table(entity)
                .columns([user_col, skill_col])
                .on_conflict(
                    OnConflict::columns([user_col, skill_col])
                        .do_nothing()
                        .to_owned(),
                );
        });
        insert
            .values([user_id.into(), skill_id.into()])
            .warn_err()?;

        let backend = conn.get_database_backend();
        conn.execute(backend.build(&insert)).await.warn_err()?;
        Ok(())
    }

    /// `(user_id, skill_id)` pairs for the given users.
    pub async fn links<C>(self, conn: &C, user_ids: &[i32]) -> Result<Vec<(i32, i32)>, Error>
    where
        C: ConnectionTrait,
    {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        with_junction!(self, |entity, user_col, skill_col| {
            find_links(conn, entity, user_col, skill_col, user_ids).await
        })
    }

    /// Ids of users holding the skill stored under `name`.
    ///
    /// Stored names are normalized, so callers pass a normalized name and the
    /// comparison is exact. Folding case in SQL would only cover ASCII on SQLite.
    pub fn holders_of(self, name: &str) -> SelectStatement {
        with_junction!(self, |entity, user_col, skill_col| {
            Query::select()
                .column((entity, user_col))
                .from(entity)
                .inner_join(
                    skill::Entity,
                    Expr::col((skill::Entity, skill::Column::Id)).equals((entity, skill_col)),
                )
                .and_where(Expr::col((skill::Entity, skill::Column::Name)).eq(name))
                .to_owned()
        })
    }
}

async fn clear_links<C, J>(conn: &C, _: J, user_col: J::Column, user_id: i32) -> Result<(), Error>
where
    C: ConnectionTrait,
    J: EntityTrait,
{
    J::delete_many()
        .filter(user_col.eq(user_id))
        .exec(conn)
        .await
        .warn_err()?;
    Ok(())
}

async fn find_links<C, J>(
    conn: &C,
    _: J,
    user_col: J::Column,
    skill_col: J::Column,
    user_ids: &[i32],
) -> Result<Vec<(i32, i32)>, Error>
where
    C: ConnectionTrait,
    J: EntityTrait,
{
    J::find()
        .filter(user_col.is_in(user_ids.iter().copied()))
        .select_only()
        .column(user_col)
        .column(skill_col)
        .into_tuple::<(i32, i32)>()
        .all(conn)
        .await
        .warn_err()
}

/// Normalized skill names per association. `None` leaves that association alone,
/// `Some` replaces it (an empty list clears it).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssociationPlan {
    pub general: Option<Vec<String>>,
    pub known: Option<Vec<String>>,
    pub desired: Option<Vec<String>>,
}

fn normalize_list(names: &[String]) -> Vec<String> {
    normalize_all(names.iter().map(String::as_str))
}

impl AssociationPlan {
    /// A fresh user: every association is written, legacy `skills` text feeds `my_skills`.
    pub fn for_create(payload: &UserPayload) -> Self {
        let mut plan = AssociationPlan {
            general: Some(
                payload
                    .skills
                    .as_deref()
                    .map(split_legacy_skills)
                    .unwrap_or_default(),
            ),
            known: Some(
                payload
                    .known_skills
                    .as_deref()
                    .map(normalize_list)
                    .unwrap_or_default(),
            ),
            desired: Some(
                payload
                    .desired_skills
                    .as_deref()
                    .map(normalize_list)
                    .unwrap_or_default(),
            ),
        };
        plan.mirror_known_into_general();
        plan
    }

    /// An existing user: only the supplied lists are replaced.
    pub fn for_update(known: Option<&[String]>, desired: Option<&[String]>) -> Self {
        let mut plan = AssociationPlan {
            general: None,
            known: known.map(normalize_list),
            desired: desired.map(normalize_list),
        };
        plan.mirror_known_into_general();
        plan
    }

    /// Copy every known skill into the general set. When the general set is not
    /// otherwise being written it is replaced by the known list, so a cleared
    /// known set also clears `my_skills`. Desired skills are never mirrored.
    pub fn mirror_known_into_general(&mut self) {
        if let Some(known) = &self.known {
            let general = self.general.get_or_insert_with(Vec::new);
            for name in known {
                if !general.contains(name) {
                    general.push(name.clone());
                }
            }
        }
    }

    pub fn names(&self, set: SkillSet) -> Option<&[String]> {
        match set {
            SkillSet::General => self.general.as_deref(),
            SkillSet::Known => self.known.as_deref(),
            SkillSet::Desired => self.desired.as_deref(),
        }
    }

    /// Clear and repopulate each planned association. Run inside the caller's transaction.
    pub async fn apply<C>(&self, conn: &C, user_id: i32) -> Result<(), Error>
    where
        C: ConnectionTrait,
    {
        for set in ALL_SKILL_SETS {
            let Some(names) = self.names(set) else {
                continue;
            };

            set.clear(conn, user_id).await?;
            for skill in skill_registry::resolve(conn, names).await? {
                set.attach(conn, user_id, skill.id).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn create_mirrors_known_after_legacy_skills() {
        let payload = UserPayload {
            skills: Some("python, go".to_string()),
            known_skills: Some(strings(&["Go", " rust "])),
            desired_skills: Some(strings(&["haskell"])),
            ..Default::default()
        };

        let plan = AssociationPlan::for_create(&payload);
        assert_eq!(plan.general, Some(strings(&["Python", "Go", "Rust"])));
        assert_eq!(plan.known, Some(strings(&["Go", "Rust"])));
        assert_eq!(plan.desired, Some(strings(&["Haskell"])));
    }

    #[test]
    fn create_without_skills_writes_empty_sets() {
        let plan = AssociationPlan::for_create(&UserPayload::default());
        assert_eq!(plan.general, Some(vec![]));
        assert_eq!(plan.known, Some(vec![]));
        assert_eq!(plan.desired, Some(vec![]));
    }

    #[test]
    fn update_without_lists_touches_nothing() {
        assert_eq!(
            AssociationPlan::for_update(None, None),
            AssociationPlan::default()
        );
    }

    #[test]
    fn empty_known_list_clears_general_too() {
        let plan = AssociationPlan::for_update(Some(&[]), None);
        assert_eq!(plan.known, Some(vec![]));
        assert_eq!(plan.general, Some(vec![]));
        assert_eq!(plan.desired, None);
    }

    #[test]
    fn desired_skills_are_not_mirrored() {
        let desired = strings(&["Go"]);
        let plan = AssociationPlan::for_update(None, Some(&desired));
        assert_eq!(plan.general, None);
        assert_eq!(plan.desired, Some(strings(&["Go"])));
    }

    #[test]
    fn holders_query_compares_the_stored_name() {
        use sea_orm::sea_query::SqliteQueryBuilder;

        let sql = SkillSet::Known.holders_of("Élixir").to_string(SqliteQueryBuilder);
        assert!(sql.contains("\"user_known_skill\""));
        assert!(!sql.contains("LOWER"));
        assert!(sql.contains("'Élixir'"));
    }
}
