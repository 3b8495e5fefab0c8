pub mod db;
pub mod encryption;
