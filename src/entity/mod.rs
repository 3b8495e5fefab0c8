pub mod hackathon_experience;
pub mod skill;
pub mod user;
pub mod user_desired_skill;
pub mod user_known_skill;
pub mod user_skill;
