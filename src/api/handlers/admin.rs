use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{AddUserForm, AdminEditForm, CsrfForm, FormPairs},
    responses::{FormView, RoleView, UserView},
};
use crate::api::extractors::admin::AdminUser;
use crate::api::views::{context_for, render, render_form_error};
use std::sync::Arc;
use tracing::{debug, error, info};

pub async fn user_list(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_directory.find_all().await?;
    debug!("Listing {} users", users.len());

    let views: Vec<UserView> = users.iter().map(UserView::from).collect();
    let mut ctx = context_for(Some(&admin.0));
    ctx.insert("users", &views);
    render(&state, "admin", &ctx)
}

pub async fn add_user_page(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.role_directory.find_all().await?;

    let mut ctx = context_for(Some(&admin.0));
    ctx.insert("form", &FormView::default());
    ctx.insert("roles", &roles.iter().map(RoleView::from).collect::<Vec<_>>());
    render(&state, "add-user", &ctx)
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = AddUserForm::try_from(FormPairs(pairs))?;
    admin.verify_csrf(&form.csrf_token)?;

    let sticky = FormView {
        username: form.user.username.clone(),
        name: form.user.name.clone(),
        surname: form.user.surname.clone(),
        email: form.user.email.clone(),
        role_ids: form.user.role_ids.clone(),
    };

    match state.user_directory.save(form.user).await {
        Ok(created) => {
            info!("Admin {} created user {}", admin.0.user_id, created.id);
            Ok(Redirect::to("/admin/user-list").into_response())
        }
        Err(e) => {
            let roles = state.role_directory.find_all().await?;
            let mut ctx = context_for(Some(&admin.0));
            ctx.insert("form", &sticky);
            ctx.insert("roles", &roles.iter().map(RoleView::from).collect::<Vec<_>>());
            Ok(render_form_error(&state, "add-user", ctx, e)?.into_response())
        }
    }
}

pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_directory.get_by_id(id).await?;
    let roles = state.role_directory.find_all().await?;

    let mut ctx = context_for(Some(&admin.0));
    ctx.insert("user", &UserView::from(&user));
    ctx.insert("roles", &roles.iter().map(RoleView::from).collect::<Vec<_>>());
    render(&state, "admin-edit-user", &ctx)
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = AdminEditForm::try_from(FormPairs(pairs))?;
    admin.verify_csrf(&form.csrf_token)?;

    match state.user_directory.update(id, form.patch.clone()).await {
        Ok(updated) => {
            info!("Admin {} updated user {}", admin.0.user_id, updated.id);
            Ok(Redirect::to("/admin/user-list").into_response())
        }
        Err(e @ AppError::Validation(_)) => {
            let user = state.user_directory.get_by_id(id).await?;
            let roles = state.role_directory.find_all().await?;

            let mut view = UserView::from(&user);
            view.name = form.patch.name;
            view.surname = form.patch.surname;
            view.email = form.patch.email;

            let mut ctx = context_for(Some(&admin.0));
            ctx.insert("user", &view);
            ctx.insert("roles", &roles.iter().map(RoleView::from).collect::<Vec<_>>());
            Ok(render_form_error(&state, "admin-edit-user", ctx, e)?.into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect, AppError> {
    admin.verify_csrf(&form.csrf_token)?;

    if admin.0.user_id == id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    match state.user_directory.delete(id).await {
        Ok(_) => {
            info!("Admin {} deleted user {}", admin.0.user_id, id);
            Ok(Redirect::to("/admin/user-list"))
        }
        Err(e) => {
            error!("Failed to delete user {}: {:?}", id, e);
            Err(e)
        }
    }
}
