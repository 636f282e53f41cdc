use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::{auth::Principal, role::ROLE_ADMIN};
use crate::error::AppError;
use std::sync::Arc;
use tracing::warn;

use super::auth::{verify_csrf, AuthUser};

/// An authenticated principal whose account currently holds the admin role.
pub struct AdminUser(pub Principal);

impl AdminUser {
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), AppError> {
        verify_csrf(&self.0, submitted)
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        // Token authorities can be stale; the stored memberships decide.
        let Some(user) = app_state.user_directory.find_by_id(principal.user_id).await? else {
            warn!(user_id = principal.user_id, "admin access with a token for a deleted account");
            return Err(AppError::Unauthorized);
        };

        if !user.has_role(ROLE_ADMIN) {
            warn!(
                path = %parts.uri.path(),
                user_id = principal.user_id,
                username = %principal.username,
                "role access denied: user lacks {}", ROLE_ADMIN
            );
            return Err(AppError::Forbidden("Administrator access required".into()));
        }

        Ok(AdminUser(principal))
    }
}
