mod common;

use axum::http::StatusCode;
use common::{location, set_cookie_value, Session, TestApp};

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::new().await;
    let session = app.login_admin().await;

    let response = app.post_form("/auth/refresh", "", Some(&session)).await;
    assert_eq!(location(&response), "/default");

    let new_refresh = set_cookie_value(&response, "refresh_token").expect("refresh cookie rotated");
    let new_access = set_cookie_value(&response, "access_token").expect("access cookie reissued");
    let new_csrf = set_cookie_value(&response, "csrf_token").expect("csrf cookie reissued");
    assert_ne!(new_refresh, session.refresh_token);
    assert_ne!(new_csrf, session.csrf_token);

    // The spent refresh token no longer works.
    let replay = app.post_form("/auth/refresh", "", Some(&session)).await;
    assert_eq!(location(&replay), "/login");

    let rotated = Session {
        access_token: new_access,
        refresh_token: new_refresh,
        csrf_token: new_csrf,
    };
    let response = app.get("/admin/user-list", Some(&rotated)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_replayed_refresh_token_revokes_the_whole_family() {
    let app = TestApp::new().await;
    let stolen = app.login_admin().await;

    let response = app.post_form("/auth/refresh", "", Some(&stolen)).await;
    assert_eq!(location(&response), "/default");
    let rotated = Session {
        access_token: set_cookie_value(&response, "access_token").unwrap(),
        refresh_token: set_cookie_value(&response, "refresh_token").unwrap(),
        csrf_token: set_cookie_value(&response, "csrf_token").unwrap(),
    };

    let replay = app.post_form("/auth/refresh", "", Some(&stolen)).await;
    assert_eq!(location(&replay), "/login");

    // The legitimate holder of the newest token is logged out too.
    let response = app.post_form("/auth/refresh", "", Some(&rotated)).await;
    assert_eq!(location(&response), "/login");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_refresh_token_is_stored_hashed() {
    let app = TestApp::new().await;
    let session = app.login_admin().await;

    let stored: Vec<String> = sqlx::query_scalar("SELECT token_hash FROM refresh_tokens")
        .fetch_all(&app.pool)
        .await
        .unwrap();

    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0], session.refresh_token);
    assert_eq!(stored[0], app.state.auth_service.hash_token(&session.refresh_token));
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let session = app.login_admin().await;

    let response = app
        .post_form("/logout", &format!("csrf_token={}", session.csrf_token), Some(&session))
        .await;
    assert_eq!(location(&response), "/login?logout");
    assert_eq!(set_cookie_value(&response, "access_token").as_deref(), Some(""));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let response = app.post_form("/auth/refresh", "", Some(&session)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_with_forged_csrf_keeps_session() {
    let app = TestApp::new().await;
    let session = app.login_admin().await;

    let response = app.post_form("/logout", "csrf_token=forged", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.get("/admin/user-list", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_cookie_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.post_form("/auth/refresh", "", None).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_access_token_carries_authorities() {
    let app = TestApp::new().await;
    let session = app.login_admin().await;

    let claims = app.state.auth_service.verify_access_token(&session.access_token).unwrap();
    assert_eq!(claims.username, "admin");
    assert_eq!(claims.authorities, vec!["ROLE_ADMIN".to_string()]);
    assert_eq!(claims.csrf, session.csrf_token);
}
