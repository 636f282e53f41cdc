use axum::{http::StatusCode, response::Html};
use tera::Context;

use crate::api::dtos::responses::PrincipalView;
use crate::domain::models::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;

pub fn context_for(principal: Option<&Principal>) -> Context {
    let mut ctx = Context::new();
    if let Some(p) = principal {
        ctx.insert("principal", &PrincipalView::from(p));
    }
    ctx
}

pub fn render(state: &AppState, view: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    state.templates
        .render(&format!("{}.html", view), ctx)
        .map(Html)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to render {}: {:?}", view, e)))
}

/// Re-renders a form with the failure message; other errors propagate.
pub fn render_form_error(
    state: &AppState,
    view: &str,
    mut ctx: Context,
    error: AppError,
) -> Result<(StatusCode, Html<String>), AppError> {
    let status = match &error {
        AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        _ => return Err(error),
    };

    let errors: Vec<String> = error.user_message().split("; ").map(str::to_string).collect();
    ctx.insert("errors", &errors);
    Ok((status, render(state, view, &ctx)?))
}
