#![allow(dead_code)]

use bytebrigade_backend::data::alias::canonicalize;
use bytebrigade_backend::data::payload::UserPayload;
use bytebrigade_backend::service::aggregate::UserAggregate;
use bytebrigade_backend::service::synchronizer::create_user;
use bytebrigade_backend::utils::db::{connect, ensure_schema};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

pub async fn setup() -> DatabaseConnection {
    let db = connect("sqlite::memory:").await.unwrap();
    ensure_schema(&db).await.unwrap();
    db
}

pub fn payload(body: Value) -> UserPayload {
    canonicalize(body).unwrap()
}

/// A minimal valid registration body for `username`, merged with `extra`.
pub fn registration(username: &str, extra: Value) -> Value {
    let mut body = json!({
        "username": username,
        "password": "secret123",
        "name": format!("{} Example", username),
        "email": format!("{}@example.com", username),
    });
    if let (Value::Object(body), Value::Object(extra)) = (&mut body, extra) {
        body.extend(extra);
    }
    body
}

pub async fn register(db: &DatabaseConnection, username: &str, extra: Value) -> UserAggregate {
    create_user(db, payload(registration(username, extra)))
        .await
        .unwrap()
}
