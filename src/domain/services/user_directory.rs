use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{
    models::{
        auth::Credentials,
        role::Role,
        user::{NewUser, User, UserPatch, UserRecord},
    },
    ports::{CredentialHasher, UserRepository},
    services::role_directory::RoleDirectory,
};
use crate::error::AppError;

pub struct UserDirectory {
    repo: Arc<dyn UserRepository>,
    roles: Arc<RoleDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    default_role: String,
}

impl UserDirectory {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        roles: Arc<RoleDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        default_role: String,
    ) -> Self {
        Self { repo, roles, hasher, default_role }
    }

    pub fn hasher(&self) -> &dyn CredentialHasher {
        self.hasher.as_ref()
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, AppError> {
        self.repo.find_by_username(username).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    /// Persists a new user. Plaintext passwords are hashed and an empty role
    /// set falls back to the configured default role.
    pub async fn save(&self, user: NewUser) -> Result<User, AppError> {
        let errors = user.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("; ")));
        }

        let username = user.username.trim().to_string();
        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let roles = if user.role_ids.is_empty() {
            vec![self.default_role().await?]
        } else {
            self.roles.resolve_ids(&user.role_ids).await?
        };
        let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();

        let record = UserRecord {
            username,
            password_hash: self.hasher.hash(&user.password)?,
            name: user.name,
            surname: user.surname,
            email: user.email,
            created_at: Utc::now(),
        };

        let created = self.repo.create(&record, &role_ids).await?;
        info!("Created user {} (id {}) with roles {:?}", created.username, created.id, created.authorities());
        Ok(created)
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let existing = self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        let errors = patch.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("; ")));
        }

        // Re-hash only when the candidate does not already match the stored hash.
        let password_hash = match patch.new_password() {
            Some(candidate) if !self.hasher.verify(candidate, &existing.password_hash) => {
                debug!("Password changed for user {}", id);
                self.hasher.hash(candidate)?
            }
            _ => existing.password_hash.clone(),
        };

        let roles = match patch.role_ids.as_deref() {
            Some(ids) if !ids.is_empty() => Some(self.roles.resolve_ids(ids).await?),
            _ => None,
        };
        let role_ids: Option<Vec<i64>> = roles.map(|rs| rs.iter().map(|r| r.id).collect());

        let updated = self.repo.update(id, &patch, &password_hash, role_ids.as_deref()).await?;
        info!("Updated user {} (id {})", updated.username, updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn load_credentials(&self, username: &str) -> Result<Credentials, AppError> {
        let user = self.repo.find_by_username(username).await?
            .ok_or(AppError::Unauthorized)?;

        debug!("Loaded credentials for {} with authorities {:?}", user.username, user.authorities());

        Ok(Credentials::from(user))
    }

    pub async fn default_role(&self) -> Result<Role, AppError> {
        self.roles.find_by_name(&self.default_role).await?
            .ok_or_else(|| AppError::Configuration(format!("Default role {} not found", self.default_role)))
    }
}
