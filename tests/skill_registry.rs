mod common;

use bytebrigade_backend::data::error::Error;
use bytebrigade_backend::entity::{skill, user_known_skill, user_skill};
use bytebrigade_backend::service::association::SkillSet;
use bytebrigade_backend::service::aggregate::load_one;
use bytebrigade_backend::service::skill_registry::{
    self, get_or_create, normalize_skill_name,
};
use common::{register, setup};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn spellings_resolve_to_one_skill() {
    let db = setup().await;

    let mut ids = Vec::new();
    for raw in ["Python", " python ", "PYTHON"] {
        let name = normalize_skill_name(raw).unwrap();
        ids.push(get_or_create(&db, &name).await.unwrap().id);
    }

    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    let skills = skill::Entity::find().all(&db).await.unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name, "Python");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_get_or_create_yields_one_row() {
    let db = setup().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { get_or_create(&db, "Kubernetes").await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(skill::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn create_rejects_existing_names_in_any_case() {
    let db = setup().await;

    let created = skill_registry::create(&db, "  typescript ").await.unwrap();
    assert_eq!(created.name, "Typescript");

    assert_eq!(
        skill_registry::create(&db, "TYPESCRIPT").await.unwrap_err(),
        Error::RegisteredSkill
    );
    assert_eq!(
        skill_registry::create(&db, "   ").await.unwrap_err(),
        Error::MissingField("name".to_string())
    );
    assert_eq!(
        skill_registry::create(&db, &"x".repeat(101)).await.unwrap_err(),
        Error::InvalidFields(vec!["name".to_string()])
    );
}

#[tokio::test]
async fn list_is_sorted_by_name() {
    let db = setup().await;
    for name in ["rust", "go", "elixir"] {
        skill_registry::create(&db, name).await.unwrap();
    }

    let names: Vec<String> = skill_registry::list(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Elixir", "Go", "Rust"]);
}

#[tokio::test]
async fn rename_normalizes_and_guards_uniqueness() {
    let db = setup().await;
    let go = skill_registry::create(&db, "go").await.unwrap();
    skill_registry::create(&db, "rust").await.unwrap();

    let renamed = skill_registry::rename(&db, go.id, "golang").await.unwrap();
    assert_eq!(renamed.id, go.id);
    assert_eq!(renamed.name, "Golang");

    // same name again is a no-op
    assert_eq!(
        skill_registry::rename(&db, go.id, "GOLANG").await.unwrap().name,
        "Golang"
    );
    assert_eq!(
        skill_registry::rename(&db, go.id, "Rust").await.unwrap_err(),
        Error::RegisteredSkill
    );
    assert_eq!(
        skill_registry::rename(&db, 999, "Zig").await.unwrap_err(),
        Error::NotFound
    );
}

#[tokio::test]
async fn delete_detaches_the_skill_from_every_user() {
    let db = setup().await;
    let user = register(&db, "guido", json!({ "knownSkills": ["Python", "C"] })).await;
    let python = user
        .known_skills
        .iter()
        .find(|s| s.name == "Python")
        .unwrap()
        .clone();

    skill_registry::delete(&db, python.id).await.unwrap();

    let reloaded = load_one(&db, user.user.id).await.unwrap();
    assert_eq!(reloaded.skill_names(SkillSet::Known), vec!["C"]);
    assert_eq!(reloaded.skill_names(SkillSet::General), vec!["C"]);
    assert_eq!(user_known_skill::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(user_skill::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(
        skill_registry::find(&db, python.id).await.unwrap_err(),
        Error::NotFound
    );
    assert_eq!(
        skill_registry::delete(&db, python.id).await.unwrap_err(),
        Error::NotFound
    );
}
