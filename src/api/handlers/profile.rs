use axum::{extract::State, response::{IntoResponse, Redirect, Response}, Form};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::{ProfileForm, SelfUpdateForm}, responses::UserView};
use crate::api::extractors::auth::AuthUser;
use crate::api::views::{context_for, render, render_form_error};
use crate::domain::models::user::UserPatch;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn user_page(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_directory.find_by_username(&auth.0.username).await?;

    let mut ctx = context_for(Some(&auth.0));
    ctx.insert("user", &UserView::from(&user));
    render(&state, "user-page", &ctx)
}

pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_directory.find_by_username(&auth.0.username).await?;

    let mut ctx = context_for(Some(&auth.0));
    ctx.insert("user", &UserView::from(&user));
    render(&state, "edit-user", &ctx)
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    auth.verify_csrf(&form.csrf_token)?;

    let current = state.user_directory.find_by_username(&auth.0.username).await?;
    let patch = UserPatch::from(form);

    match state.user_directory.update(current.id, patch.clone()).await {
        Ok(updated) => {
            info!("User {} edited own profile", updated.id);
            Ok(Redirect::to("/user").into_response())
        }
        Err(e) => {
            let mut view = UserView::from(&current);
            view.name = patch.name;
            view.surname = patch.surname;
            view.email = patch.email;

            let mut ctx = context_for(Some(&auth.0));
            ctx.insert("user", &view);
            Ok(render_form_error(&state, "edit-user", ctx, e)?.into_response())
        }
    }
}

/// Self-update addressed by id. Only administrators may target another account.
pub async fn update_by_id(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Form(form): Form<SelfUpdateForm>,
) -> Result<Redirect, AppError> {
    auth.verify_csrf(&form.csrf_token)?;

    if form.id != auth.0.user_id && !auth.0.is_admin() {
        warn!(user_id = auth.0.user_id, target = form.id, "self-update denied for foreign id");
        return Err(AppError::Forbidden("You may only update your own account".into()));
    }

    let id = form.id;
    state.user_directory.update(id, UserPatch::from(form)).await?;
    Ok(Redirect::to("/user"))
}
