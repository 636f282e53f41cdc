use std::sync::Arc;
use tracing::info;

use crate::domain::{models::role::Role, ports::RoleRepository};
use crate::error::AppError;

pub struct RoleDirectory {
    repo: Arc<dyn RoleRepository>,
}

impl RoleDirectory {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> Result<Vec<Role>, AppError> {
        self.repo.list().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Role, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Role with id {} not found", id)))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.repo.find_by_name(name).await
    }

    /// Resolves every id against the store. Duplicate ids collapse.
    pub async fn resolve_ids(&self, ids: &[i64]) -> Result<Vec<Role>, AppError> {
        let mut roles: Vec<Role> = Vec::with_capacity(ids.len());
        for id in ids {
            if roles.iter().any(|r| r.id == *id) {
                continue;
            }
            roles.push(self.find_by_id(*id).await?);
        }
        Ok(roles)
    }

    pub async fn ensure_role(&self, name: &str) -> Result<Role, AppError> {
        if let Some(existing) = self.repo.find_by_name(name).await? {
            return Ok(existing);
        }

        Role::validate_name(name)?;
        let created = self.repo.create(name).await?;
        info!("Created role {} (id {})", created.name, created.id);
        Ok(created)
    }
}
