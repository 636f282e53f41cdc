use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Form,
};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CsrfForm, LoginForm, LoginQuery};
use crate::api::extractors::{
    auth::{verify_csrf, ACCESS_COOKIE, CSRF_COOKIE, REFRESH_COOKIE},
    maybe_auth::MaybeAuthUser,
};
use crate::api::views::{context_for, render};
use crate::domain::models::auth::{Credentials, TokenPair};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn home() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut ctx = context_for(None);
    ctx.insert("error", &query.error.is_some());
    ctx.insert("logout", &query.logout.is_some());
    render(&state, "login", &ctx)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(payload): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let username = payload.username.trim();
    let credentials = match state.user_directory.load_credentials(username).await {
        Ok(c) => c,
        Err(AppError::Unauthorized) => {
            warn!("Login failed: unknown user {}", username);
            return Ok(Redirect::to("/login?error"));
        }
        Err(e) => return Err(e),
    };

    if !state.user_directory.hasher().verify(&payload.password, &credentials.password_hash) {
        warn!("Login failed: bad password for {}", credentials.username);
        return Ok(Redirect::to("/login?error"));
    }

    let tokens = state.auth_service.login(&credentials).await?;
    set_cookies(&cookies, &state, &tokens);

    info!("User logged in: {}", credentials.user_id);

    Ok(Redirect::to("/default"))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Redirect, AppError> {
    let refresh_cookie = cookies.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value().to_string();

    let record = state.auth_service.find_refresh(&raw_token).await?;

    let user = state.user_directory.find_by_id(record.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let credentials = Credentials::from(user);

    let tokens = state.auth_service.refresh(&raw_token, &credentials).await?;
    set_cookies(&cookies, &state, &tokens);

    info!("Token refreshed for user: {}", credentials.user_id);

    Ok(Redirect::to("/default"))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    MaybeAuthUser(principal): MaybeAuthUser,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect, AppError> {
    if let Some(principal) = &principal {
        verify_csrf(principal, &form.csrf_token)?;
    }

    if let Some(cookie) = cookies.get(REFRESH_COOKIE) {
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            warn!("Failed to revoke refresh tokens on logout: {:?}", e);
        }
    }

    for name in [ACCESS_COOKIE, REFRESH_COOKIE, CSRF_COOKIE] {
        cookies.remove(Cookie::build((name, "")).path("/").into());
    }

    info!("User logged out");

    Ok(Redirect::to("/login?logout"))
}

fn set_cookies(cookies: &Cookies, state: &AppState, tokens: &TokenPair) {
    let secure = state.config.cookie_secure;

    let mut access_c = Cookie::new(ACCESS_COOKIE, tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(secure);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(state.config.access_token_minutes));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(secure);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);

    // Readable by page scripts; forms receive the same value from the view.
    let mut csrf_c = Cookie::new(CSRF_COOKIE, tokens.csrf_token.clone());
    csrf_c.set_secure(secure);
    csrf_c.set_same_site(SameSite::Strict);
    csrf_c.set_path("/");
    csrf_c.set_max_age(Duration::minutes(state.config.access_token_minutes));
    cookies.add(csrf_c);
}
