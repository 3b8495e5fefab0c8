use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::data::error::Error;
use crate::entity::{hackathon_experience, skill, user};
use crate::service::association::{SkillSet, ALL_SKILL_SETS};
use crate::utils::db::StanderizeError;

/// A user together with its skill associations and hackathon experiences.
#[derive(Debug, Clone)]
pub struct UserAggregate {
    pub user: user::Model,
    pub general_skills: Vec<skill::Model>,
    pub known_skills: Vec<skill::Model>,
    pub desired_skills: Vec<skill::Model>,
    pub experiences: Vec<hackathon_experience::Model>,
}

impl UserAggregate {
    pub fn skills(&self, set: SkillSet) -> &[skill::Model] {
        match set {
            SkillSet::General => &self.general_skills,
            SkillSet::Known => &self.known_skills,
            SkillSet::Desired => &self.desired_skills,
        }
    }

    pub fn skill_names(&self, set: SkillSet) -> Vec<&str> {
        self.skills(set).iter().map(|s| s.name.as_str()).collect()
    }

    fn skills_mut(&mut self, set: SkillSet) -> &mut Vec<skill::Model> {
        match set {
            SkillSet::General => &mut self.general_skills,
            SkillSet::Known => &mut self.known_skills,
            SkillSet::Desired => &mut self.desired_skills,
        }
    }
}

pub async fn load_one<C>(conn: &C, id: i32) -> Result<UserAggregate, Error>
where
    C: ConnectionTrait,
{
    let user = user::Entity::find_by_id(id)
        .one(conn)
        .await
        .warn_err()?
        .ok_or(Error::NotFound)?;

    load_many(conn, vec![user])
        .await?
        .pop()
        .ok_or(Error::InternalServerError)
}

/// Users in their natural order: newest first.
pub fn natural_order(query: Select<user::Entity>) -> Select<user::Entity> {
    query
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
}

/// Offsets and limits are bound as signed 64-bit integers.
const MAX_ROWS: u64 = i64::MAX as u64;

pub async fn load_page<C>(conn: &C, skip: u64, limit: u64) -> Result<Vec<UserAggregate>, Error>
where
    C: ConnectionTrait,
{
    let users = natural_order(user::Entity::find())
        .offset(skip.min(MAX_ROWS))
        .limit(limit.min(MAX_ROWS))
        .all(conn)
        .await
        .warn_err()?;

    load_many(conn, users).await
}

/// Attach associations and experiences to `users`, preserving their order.
///
/// A fixed number of queries regardless of how many users are passed in.
pub async fn load_many<C>(conn: &C, users: Vec<user::Model>) -> Result<Vec<UserAggregate>, Error>
where
    C: ConnectionTrait,
{
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let mut aggregates: Vec<UserAggregate> = users
        .into_iter()
        .map(|user| UserAggregate {
            user,
            general_skills: Vec::new(),
            known_skills: Vec::new(),
            desired_skills: Vec::new(),
            experiences: Vec::new(),
        })
        .collect();
    if ids.is_empty() {
        return Ok(aggregates);
    }
    let position: HashMap<i32, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut links = Vec::with_capacity(ALL_SKILL_SETS.len());
    for set in ALL_SKILL_SETS {
        links.push((set, set.links(conn, &ids).await?));
    }

    let mut skill_ids: Vec<i32> = links
        .iter()
        .flat_map(|(_, pairs)| pairs.iter().map(|(_, skill_id)| *skill_id))
        .collect();
    skill_ids.sort_unstable();
    skill_ids.dedup();

    let skills: HashMap<i32, skill::Model> = if skill_ids.is_empty() {
        HashMap::new()
    } else {
        skill::Entity::find()
            .filter(skill::Column::Id.is_in(skill_ids))
            .all(conn)
            .await
            .warn_err()?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    for (set, pairs) in links {
        for (user_id, skill_id) in pairs {
            if let (Some(&i), Some(skill)) = (position.get(&user_id), skills.get(&skill_id)) {
                aggregates[i].skills_mut(set).push(skill.clone());
            }
        }
    }

    let experiences = hackathon_experience::Entity::find()
        .filter(hackathon_experience::Column::UserId.is_in(ids.iter().copied()))
        .order_by_desc(hackathon_experience::Column::CreatedAt)
        .order_by_desc(hackathon_experience::Column::Id)
        .all(conn)
        .await
        .warn_err()?;
    for experience in experiences {
        if let Some(&i) = position.get(&experience.user_id) {
            aggregates[i].experiences.push(experience);
        }
    }

    for aggregate in &mut aggregates {
        for set in ALL_SKILL_SETS {
            aggregate.skills_mut(set).sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    Ok(aggregates)
}
