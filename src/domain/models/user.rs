use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::role::Role;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(Role::authority).collect()
    }

    pub fn role_ids(&self) -> Vec<i64> {
        self.roles.iter().map(|r| r.id).collect()
    }
}

/// A user as submitted for creation. `password` is plaintext until the
/// directory hashes it.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role_ids: Vec<i64>,
}

/// Row written by a repository; the password is already hashed.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: Option<String>,
    pub role_ids: Option<Vec<i64>>,
}

impl NewUser {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let username_len = self.username.trim().chars().count();
        if !(2..=50).contains(&username_len) {
            errors.push("Username must be between 2 and 50 characters".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password must not be empty".to_string());
        }
        errors.extend(validate_profile(&self.name, &self.surname, &self.email));
        errors
    }
}

impl UserPatch {
    pub fn validate(&self) -> Vec<String> {
        validate_profile(&self.name, &self.surname, &self.email)
    }

    /// Blank password fields mean "keep the current password".
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

fn validate_profile(name: &str, surname: &str, email: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if name.chars().count() > 50 {
        errors.push("Name must be at most 50 characters".to_string());
    }
    if surname.chars().count() > 50 {
        errors.push("Surname must be at most 50 characters".to_string());
    }
    if !email.is_empty() && !looks_like_email(email) {
        errors.push(format!("'{}' is not a valid email address", email));
    }
    errors
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}
