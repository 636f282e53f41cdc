use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const ROLE_PREFIX: &str = "ROLE_";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_USER: &str = "ROLE_USER";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    /// Capability string handed to the access-control layer.
    pub fn authority(&self) -> String {
        self.name.clone()
    }

    pub fn display_name(&self) -> &str {
        self.name.strip_prefix(ROLE_PREFIX).unwrap_or(&self.name)
    }

    pub fn validate_name(name: &str) -> Result<(), AppError> {
        let len = name.chars().count();
        if !(4..=20).contains(&len) {
            return Err(AppError::Validation(format!(
                "Role name must be between 4 and 20 characters, got '{}'",
                name
            )));
        }
        Ok(())
    }
}
