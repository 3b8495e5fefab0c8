pub mod aggregate;
pub mod association;
pub mod search;
pub mod skill_registry;
pub mod synchronizer;
