mod common;

use bytebrigade_backend::service::search::{search_users, users_with_skill, SearchQuery};
use common::{register, setup};
use sea_orm::DatabaseConnection;
use serde_json::json;

async fn usernames(db: &DatabaseConnection, skills: &str, include_beginner: Option<&str>) -> Vec<String> {
    let query = SearchQuery::parse(Some(skills), include_beginner);
    search_users(db, &query)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|u| u.user.username)
        .collect()
}

async fn seed(db: &DatabaseConnection) {
    // a: Go and Rust, not a beginner
    register(db, "a", json!({ "knownSkills": ["Go", "Rust"], "isBeginner": false })).await;
    // b: Go and Rust, beginner
    register(db, "b", json!({ "knownSkills": ["go", "rust"], "isBeginner": true })).await;
    // c: only Go
    register(db, "c", json!({ "knownSkills": ["Go"] })).await;
    // d: Rust only through the legacy general set, Go known
    register(db, "d", json!({ "skills": "rust", "knownSkills": ["Go"] })).await;
    // e: wants Go and Rust but knows neither
    register(db, "e", json!({ "desiredSkills": ["Go", "Rust"] })).await;
}

#[tokio::test]
async fn every_requested_skill_must_be_held() {
    let db = setup().await;
    seed(&db).await;

    assert_eq!(usernames(&db, "Go,Rust", None).await, vec!["d", "b", "a"]);
}

#[tokio::test]
async fn beginners_can_be_excluded() {
    let db = setup().await;
    seed(&db).await;

    assert_eq!(
        usernames(&db, "Go,Rust", Some("false")).await,
        vec!["d", "a"]
    );
}

#[tokio::test]
async fn matching_ignores_case_and_repeats() {
    let db = setup().await;
    seed(&db).await;

    assert_eq!(
        usernames(&db, " go ,RUST,Go", None).await,
        vec!["d", "b", "a"]
    );
}

#[tokio::test]
async fn a_user_is_returned_once_even_when_both_sets_match() {
    let db = setup().await;
    // known skills are mirrored, so Go sits in both searched sets
    register(&db, "solo", json!({ "knownSkills": ["Go"] })).await;

    assert_eq!(usernames(&db, "Go", None).await, vec!["solo"]);
}

#[tokio::test]
async fn no_skills_means_everyone() {
    let db = setup().await;
    seed(&db).await;

    let all = search_users(&db, &SearchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 5);

    let experienced = search_users(&db, &SearchQuery::parse(None, Some("false")))
        .await
        .unwrap();
    assert_eq!(experienced.len(), 4);
}

#[tokio::test]
async fn unknown_skill_matches_nobody() {
    let db = setup().await;
    seed(&db).await;

    assert!(usernames(&db, "Go,Cobol", None).await.is_empty());
}

#[tokio::test]
async fn single_skill_lookup() {
    let db = setup().await;
    seed(&db).await;

    let holders: Vec<String> = users_with_skill(&db, Some("rust"))
        .await
        .unwrap()
        .into_iter()
        .filter_map(|u| u.user.username)
        .collect();
    assert_eq!(holders, vec!["d", "b", "a"]);

    assert!(users_with_skill(&db, Some("  ")).await.unwrap().is_empty());
    assert!(users_with_skill(&db, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_ascii_names_match_in_any_case() {
    let db = setup().await;
    register(&db, "jose", json!({ "knownSkills": ["Élixir"] })).await;
    register(&db, "ana", json!({ "skills": "ÉLIXIR", "isBeginner": true })).await;

    assert_eq!(usernames(&db, "élixir", None).await, vec!["ana", "jose"]);
    assert_eq!(usernames(&db, "ÉLIXIR", Some("false")).await, vec!["jose"]);

    let holders = users_with_skill(&db, Some("éLiXiR")).await.unwrap();
    assert_eq!(holders.len(), 2);
}
