use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{role::ROLE_ADMIN, user::User};

pub const TOKEN_AUDIENCE: &str = "user-admin-web";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub username: String,
    pub authorities: Vec<String>,
    pub csrf: String,
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: i64,
    pub family_id: Uuid,
    pub generation_id: i32,
    /// Set once the token has been exchanged. A used token coming back means it leaked.
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// What the credential check needs to know about an account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub authorities: Vec<String>,
}

impl From<User> for Credentials {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            authorities: user.authorities(),
            username: user.username,
            password_hash: user.password_hash,
        }
    }
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

/// The authenticated identity behind a request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub authorities: Vec<String>,
    pub csrf_token: String,
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn is_admin(&self) -> bool {
        self.has_authority(ROLE_ADMIN)
    }
}

impl TryFrom<Claims> for Principal {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.sub.parse()?,
            username: claims.username,
            authorities: claims.authorities,
            csrf_token: claims.csrf,
        })
    }
}
