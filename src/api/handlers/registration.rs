use axum::{extract::State, response::{IntoResponse, Redirect, Response}, Form};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::RegistrationForm, responses::FormView};
use crate::api::views::{context_for, render, render_form_error};
use crate::domain::models::user::NewUser;
use std::sync::Arc;
use tracing::info;

pub async fn registration_page(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let mut ctx = context_for(None);
    ctx.insert("form", &FormView::default());
    render(&state, "registration", &ctx)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let new_user = NewUser::from(payload);
    let sticky = FormView {
        username: new_user.username.clone(),
        name: new_user.name.clone(),
        surname: new_user.surname.clone(),
        email: new_user.email.clone(),
        role_ids: Vec::new(),
    };

    match state.user_directory.save(new_user).await {
        Ok(created) => {
            info!("Registered user {}", created.username);
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            let mut ctx = context_for(None);
            ctx.insert("form", &sticky);
            Ok(render_form_error(&state, "registration", ctx, e)?.into_response())
        }
    }
}
