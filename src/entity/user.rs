use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub salted_password: Option<String>,
    pub salt: Option<String>,
    pub name: String,
    pub college_name: Option<String>,
    pub year: Option<i16>,
    #[sea_orm(unique, indexed)]
    pub email: String,
    pub gender: Option<Gender>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub is_beginner: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
    #[sea_orm(string_value = "prefer-not-to-say")]
    PreferNotToSay,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hackathon_experience::Entity")]
    HackathonExperience,
}

impl Related<super::hackathon_experience::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HackathonExperience.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The legacy `my_skills` association.
pub struct GeneralSkills;

pub struct KnownSkills;

pub struct DesiredSkills;

impl Linked for GeneralSkills {
    type FromEntity = Entity;
    type ToEntity = super::skill::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            super::user_skill::Relation::User.def().rev(),
            super::user_skill::Relation::Skill.def(),
        ]
    }
}

impl Linked for KnownSkills {
    type FromEntity = Entity;
    type ToEntity = super::skill::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            super::user_known_skill::Relation::User.def().rev(),
            super::user_known_skill::Relation::Skill.def(),
        ]
    }
}

impl Linked for DesiredSkills {
    type FromEntity = Entity;
    type ToEntity = super::skill::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            super::user_desired_skill::Relation::User.def().rev(),
            super::user_desired_skill::Relation::Skill.def(),
        ]
    }
}
