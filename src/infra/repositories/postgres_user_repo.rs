use crate::domain::{
    models::user::{User, UserPatch, UserRecord},
    ports::UserRepository,
};
use crate::error::AppError;
use super::{attach_roles, MembershipRow, USER_COLUMNS};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;

const MEMBERSHIP_SQL: &str = "SELECT ur.user_id, r.id AS role_id, r.name AS role_name FROM user_roles ur JOIN roles r ON r.id = ur.role_id";

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_roles(&self, user: Option<User>) -> Result<Option<User>, AppError> {
        let Some(user) = user else {
            return Ok(None);
        };

        let memberships = sqlx::query_as::<_, MembershipRow>(&format!("{} WHERE ur.user_id = $1 ORDER BY r.id", MEMBERSHIP_SQL))
            .bind(user.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut users = [user];
        attach_roles(&mut users, memberships);
        let [user] = users;
        Ok(Some(user))
    }

    async fn insert_memberships(tx: &mut Transaction<'_, Postgres>, user_id: i64, role_ids: &[i64]) -> Result<(), AppError> {
        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut **tx)
                .await
                .map_err(AppError::Database)?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &UserRecord, role_ids: &[i64]) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash, name, surname, email, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        ))
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.surname)
            .bind(&user.email)
            .bind(user.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        Self::insert_memberships(&mut tx, created.id, role_ids).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.with_roles(Some(created)).await?
            .ok_or(AppError::InternalWithMsg("Created user vanished".into()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        self.with_roles(user).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        self.with_roles(user).await
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id ASC", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let memberships = sqlx::query_as::<_, MembershipRow>(&format!("{} ORDER BY ur.user_id, r.id", MEMBERSHIP_SQL))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        attach_roles(&mut users, memberships);
        Ok(users)
    }

    async fn update(&self, id: i64, patch: &UserPatch, password_hash: &str, role_ids: Option<&[i64]>) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, surname = $2, email = $3, password_hash = $4 WHERE id = $5 RETURNING {}",
            USER_COLUMNS
        ))
            .bind(&patch.name)
            .bind(&patch.surname)
            .bind(&patch.email)
            .bind(password_hash)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        if let Some(role_ids) = role_ids {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            Self::insert_memberships(&mut tx, id, role_ids).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        self.with_roles(Some(updated)).await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
