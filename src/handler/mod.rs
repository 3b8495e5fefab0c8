pub mod health;
pub mod login;
pub mod search;
pub mod skills;
pub mod users;
