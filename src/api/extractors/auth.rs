use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Principal;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_COOKIE: &str = "csrf_token";

pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Form posts carry the csrf token issued with the session.
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), AppError> {
        verify_csrf(&self.0, submitted)
    }
}

pub fn verify_csrf(principal: &Principal, submitted: &str) -> Result<(), AppError> {
    if submitted.is_empty() || submitted != principal.csrf_token {
        return Err(AppError::Forbidden("Invalid CSRF token".into()));
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::InternalWithMsg("Cookie layer missing".into()))?;

        let access_token = cookies.get(ACCESS_COOKIE)
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = app_state.auth_service.verify_access_token(&access_token)?;
        let principal = Principal::try_from(claims).map_err(|e| {
            debug!("Token subject is not a user id: {}", e);
            AppError::Unauthorized
        })?;

        Span::current().record("user_id", principal.user_id);

        Ok(AuthUser(principal))
    }
}
