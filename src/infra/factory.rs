use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::{AuthRepository, RoleRepository, UserRepository};
use crate::domain::services::{
    auth_service::AuthService, bootstrap, role_directory::RoleDirectory, user_directory::UserDirectory,
};
use crate::infra::crypto::argon2_hasher::Argon2Hasher;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_role_repo::PostgresRoleRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_role_repo::SqliteRoleRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let templates = Arc::new(load_templates().expect("Failed to load view templates"));

    let built = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        build_state(
            config,
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresRoleRepo::new(pool.clone())),
            Arc::new(PostgresAuthRepo::new(pool)),
            templates,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        build_state(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteRoleRepo::new(pool.clone())),
            Arc::new(SqliteAuthRepo::new(pool)),
            templates,
        )
    };
    let state = built.expect("Failed to assemble application state");

    bootstrap::ensure_admin(&state.role_directory, &state.user_directory, config)
        .await
        .expect("Failed to seed admin account");

    state
}

/// Wires directories and the auth service on top of the given repositories.
pub fn build_state(
    config: &Config,
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    auth_repo: Arc<dyn AuthRepository>,
    templates: Arc<Tera>,
) -> Result<AppState, AppError> {
    let role_directory = Arc::new(RoleDirectory::new(role_repo));
    let user_directory = Arc::new(UserDirectory::new(
        user_repo,
        role_directory.clone(),
        Arc::new(Argon2Hasher::new()),
        config.default_role.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(auth_repo, config.clone())?);

    Ok(AppState {
        config: config.clone(),
        role_directory,
        user_directory,
        auth_service,
        templates,
    })
}

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("registration.html", include_str!("../templates/registration.html")),
        ("user-page.html", include_str!("../templates/user-page.html")),
        ("edit-user.html", include_str!("../templates/edit-user.html")),
        ("admin.html", include_str!("../templates/admin.html")),
        ("add-user.html", include_str!("../templates/add-user.html")),
        ("admin-edit-user.html", include_str!("../templates/admin-edit-user.html")),
    ])?;
    Ok(tera)
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
