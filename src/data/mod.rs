pub mod alias;
pub mod error;
pub mod payload;
pub mod view;
