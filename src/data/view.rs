use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::{hackathon_experience, skill, user::Gender};
use crate::service::aggregate::UserAggregate;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SkillView {
    pub id: i32,
    pub name: String,
}

impl From<skill::Model> for SkillView {
    fn from(skill: skill::Model) -> Self {
        SkillView {
            id: skill.id,
            name: skill.name,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ExperienceView {
    pub id: i32,
    pub organizer_name: String,
    pub hackathon_name: String,
    pub description: Option<String>,
    pub achievements: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<hackathon_experience::Model> for ExperienceView {
    fn from(experience: hackathon_experience::Model) -> Self {
        ExperienceView {
            id: experience.id,
            organizer_name: experience.organizer_name,
            hackathon_name: experience.hackathon_name,
            description: experience.description,
            achievements: experience.achievements,
            created_at: experience.created_at,
        }
    }
}

/// A user as returned by every endpoint. The credential never leaves the store.
#[derive(Serialize, Debug, Clone)]
pub struct UserView {
    pub id: i32,
    pub username: Option<String>,
    pub name: String,
    pub college_name: Option<String>,
    pub year: Option<i16>,
    pub email: String,
    pub gender: Option<Gender>,
    pub my_skills: Vec<SkillView>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub is_beginner: bool,
    pub known_skills: Vec<SkillView>,
    pub desired_skills: Vec<SkillView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub hackathon_experiences: Vec<ExperienceView>,
}

impl From<UserAggregate> for UserView {
    fn from(aggregate: UserAggregate) -> Self {
        let UserAggregate {
            user,
            general_skills,
            known_skills,
            desired_skills,
            experiences,
        } = aggregate;

        UserView {
            id: user.id,
            username: user.username,
            name: user.name,
            college_name: user.college_name,
            year: user.year,
            email: user.email,
            gender: user.gender,
            my_skills: general_skills.into_iter().map(Into::into).collect(),
            linkedin_url: user.linkedin_url,
            github_url: user.github_url,
            is_beginner: user.is_beginner,
            known_skills: known_skills.into_iter().map(Into::into).collect(),
            desired_skills: desired_skills.into_iter().map(Into::into).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            hackathon_experiences: experiences.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn user_views(aggregates: Vec<UserAggregate>) -> Vec<UserView> {
    aggregates.into_iter().map(UserView::from).collect()
}
