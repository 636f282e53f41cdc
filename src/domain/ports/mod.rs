use crate::domain::models::{
    auth::RefreshTokenRecord,
    role::Role,
    user::{User, UserPatch, UserRecord},
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and its role memberships in one transaction.
    async fn create(&self, user: &UserRecord, role_ids: &[i64]) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    /// Writes profile fields and the hash; replaces memberships when `role_ids` is given.
    async fn update(&self, id: i64, patch: &UserPatch, password_hash: &str, role_ids: Option<&[i64]>) -> Result<User, AppError>;
    /// Returns false when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Role, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;
    async fn list(&self) -> Result<Vec<Role>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn mark_refresh_token_used(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
