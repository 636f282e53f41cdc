use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Principal;
use std::convert::Infallible;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

use super::auth::ACCESS_COOKIE;

pub struct MaybeAuthUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let access_token = match cookies.get(ACCESS_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        // Invalid token (expired, bad signature) -> Treat as guest
        let principal = match app_state.auth_service.verify_access_token(&access_token) {
            Ok(claims) => Principal::try_from(claims).ok(),
            Err(_) => {
                debug!("MaybeAuth: rejected access token, continuing as guest");
                None
            }
        };

        Ok(MaybeAuthUser(principal))
    }
}
