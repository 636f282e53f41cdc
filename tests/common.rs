use user_admin::{
    api::router::create_router,
    config::Config,
    domain::services::bootstrap,
    infra::{
        factory::{build_state, load_templates},
        repositories::{
            sqlite_auth_repo::SqliteAuthRepo,
            sqlite_role_repo::SqliteRoleRepo,
            sqlite_user_repo::SqliteUserRepo,
        },
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, Response, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "admin";

pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

impl Session {
    pub fn cookie_header(&self) -> String {
        format!("access_token={}; refresh_token={}", self.access_token, self.refresh_token)
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let mut config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            access_token_minutes: 15,
            cookie_secure: false,
            default_role: "ROLE_USER".to_string(),
            admin_username: "admin".to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            admin_email: "admin@example.com".to_string(),
        };
        customize(&mut config);

        let state = build_state(
            &config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteRoleRepo::new(pool.clone())),
            Arc::new(SqliteAuthRepo::new(pool.clone())),
            Arc::new(load_templates().expect("templates should parse")),
        )
            .expect("Failed to build state");

        bootstrap::ensure_admin(&state.role_directory, &state.user_directory, &config)
            .await
            .expect("Failed to seed admin");

        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn get(&self, uri: &str, session: Option<&Session>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(s) = session {
            builder = builder.header(header::COOKIE, s.cookie_header());
        }
        self.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, session: Option<&Session>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(s) = session {
            builder = builder.header(header::COOKIE, s.cookie_header());
        }
        self.router.clone().oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap()
    }

    pub async fn try_login(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &format!("username={}&password={}", username, password), None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Session {
        let response = self.try_login(username, password).await;

        assert_eq!(location(&response), "/default", "Login failed in test helper");

        Session {
            access_token: set_cookie_value(&response, "access_token").expect("No access_token cookie returned"),
            refresh_token: set_cookie_value(&response, "refresh_token").expect("No refresh_token cookie returned"),
            csrf_token: set_cookie_value(&response, "csrf_token").expect("No csrf_token cookie returned"),
        }
    }

    pub async fn login_admin(&self) -> Session {
        self.login("admin", ADMIN_PASSWORD).await
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> String {
    response.headers()
        .get(header::LOCATION)
        .map(|h| h.to_str().unwrap().to_string())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.starts_with(&prefix))
        .map(|c| {
            let value = &c[prefix.len()..];
            value.split(';').next().unwrap_or("").to_string()
        })
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
