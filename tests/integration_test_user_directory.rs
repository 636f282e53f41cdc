mod common;

use common::TestApp;
use user_admin::{
    domain::models::{
        role::{ROLE_ADMIN, ROLE_USER},
        user::{NewUser, UserPatch},
    },
    error::AppError,
};

fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: password.to_string(),
        email: format!("{}@example.com", username),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_save_without_roles_assigns_default_role() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;

    users.save(new_user("alice", "pw1")).await.unwrap();

    let alice = users.find_by_username("alice").await.unwrap();
    assert_eq!(alice.roles.len(), 1);
    assert_eq!(alice.roles[0].name, ROLE_USER);
}

#[tokio::test]
async fn test_saved_password_is_hashed_and_verifies() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;

    users.save(new_user("bob", "s3cret")).await.unwrap();

    let credentials = users.load_credentials("bob").await.unwrap();
    assert_ne!(credentials.password_hash, "s3cret");
    assert!(users.hasher().verify("s3cret", &credentials.password_hash));
    assert_eq!(credentials.authorities, vec![ROLE_USER.to_string()]);
}

#[tokio::test]
async fn test_explicit_role_ids_are_resolved_against_the_store() {
    let app = TestApp::new().await;
    let admin_role = app.state.role_directory.find_by_name(ROLE_ADMIN).await.unwrap().unwrap();
    let user_role = app.state.role_directory.find_by_name(ROLE_USER).await.unwrap().unwrap();

    let mut draft = new_user("carol", "pw");
    draft.role_ids = vec![admin_role.id, user_role.id, admin_role.id];
    let carol = app.state.user_directory.save(draft).await.unwrap();

    assert_eq!(carol.roles.len(), 2);
    assert!(carol.has_role(ROLE_ADMIN));
    assert!(carol.has_role(ROLE_USER));
}

#[tokio::test]
async fn test_unknown_role_id_fails_and_persists_nothing() {
    let app = TestApp::new().await;
    let before = app.user_count().await;

    let mut draft = new_user("dave", "pw");
    draft.role_ids = vec![9999];
    let result = app.state.user_directory.save(draft).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(app.user_count().await, before);
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;

    users.save(new_user("erin", "pw")).await.unwrap();
    let result = users.save(new_user("erin", "other")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_empty_password_is_rejected() {
    let app = TestApp::new().await;
    let result = app.state.user_directory.save(new_user("frank", "")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_missing_default_role_is_a_configuration_error() {
    let app = TestApp::with_config(|c| c.default_role = "ROLE_GUEST".to_string()).await;

    let result = app.state.user_directory.save(new_user("gina", "pw")).await;
    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn test_update_missing_user_is_not_found_and_changes_nothing() {
    let app = TestApp::new().await;
    let before = app.state.user_directory.find_all().await.unwrap();

    let patch = UserPatch {
        name: "Ghost".into(),
        password: Some("newpw".into()),
        ..Default::default()
    };
    let result = app.state.user_directory.update(424242, patch).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let after = app.state.user_directory.find_all().await.unwrap();
    assert_eq!(before.len(), after.len());
    assert!(after.iter().all(|u| u.name != "Ghost"));
}

#[tokio::test]
async fn test_update_rehashes_changed_password() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;
    let created = users.save(new_user("henry", "oldpw")).await.unwrap();

    let patch = UserPatch {
        name: "Henry".into(),
        surname: "Ford".into(),
        email: "henry@example.com".into(),
        password: Some("newpw".into()),
        role_ids: None,
    };
    let updated = users.update(created.id, patch).await.unwrap();

    assert_eq!(updated.name, "Henry");
    assert_eq!(updated.surname, "Ford");
    assert_ne!(updated.password_hash, "newpw");
    assert!(users.hasher().verify("newpw", &updated.password_hash));
    assert!(!users.hasher().verify("oldpw", &updated.password_hash));
    assert!(updated.has_role(ROLE_USER), "roles survive a profile update");
}

#[tokio::test]
async fn test_update_keeps_hash_for_blank_or_unchanged_password() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;
    let created = users.save(new_user("iris", "samepw")).await.unwrap();

    let blank = UserPatch { password: Some(String::new()), ..Default::default() };
    let after_blank = users.update(created.id, blank).await.unwrap();
    assert_eq!(after_blank.password_hash, created.password_hash);

    let same = UserPatch { password: Some("samepw".into()), ..Default::default() };
    let after_same = users.update(created.id, same).await.unwrap();
    assert_eq!(after_same.password_hash, created.password_hash);
}

#[tokio::test]
async fn test_update_replaces_roles_when_given() {
    let app = TestApp::new().await;
    let admin_role = app.state.role_directory.find_by_name(ROLE_ADMIN).await.unwrap().unwrap();
    let created = app.state.user_directory.save(new_user("jack", "pw")).await.unwrap();

    let patch = UserPatch { role_ids: Some(vec![admin_role.id]), ..Default::default() };
    let updated = app.state.user_directory.update(created.id, patch).await.unwrap();

    assert_eq!(updated.authorities(), vec![ROLE_ADMIN.to_string()]);
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found_and_count_unchanged() {
    let app = TestApp::new().await;
    let before = app.state.user_directory.find_all().await.unwrap().len();

    let result = app.state.user_directory.delete(5).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(app.state.user_directory.find_all().await.unwrap().len(), before);
}

#[tokio::test]
async fn test_delete_removes_user_and_memberships() {
    let app = TestApp::new().await;
    let created = app.state.user_directory.save(new_user("kate", "pw")).await.unwrap();

    app.state.user_directory.delete(created.id).await.unwrap();

    assert!(app.state.user_directory.find_by_id(created.id).await.unwrap().is_none());
    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE user_id = ?")
        .bind(created.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(memberships, 0);
}

#[tokio::test]
async fn test_unknown_username_lookups() {
    let app = TestApp::new().await;
    let users = &app.state.user_directory;

    assert!(matches!(users.find_by_username("nobody").await, Err(AppError::NotFound(_))));
    assert!(matches!(users.load_credentials("nobody").await, Err(AppError::Unauthorized)));
}
