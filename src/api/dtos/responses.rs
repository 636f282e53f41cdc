use serde::Serialize;

use crate::domain::models::{auth::Principal, role::Role, user::User};

#[derive(Serialize)]
pub struct RoleView {
    pub id: i64,
    pub name: String,
    pub display_name: String,
}

impl From<&Role> for RoleView {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            display_name: role.display_name().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub roles: Vec<RoleView>,
    pub role_ids: Vec<i64>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            roles: user.roles.iter().map(RoleView::from).collect(),
            role_ids: user.role_ids(),
        }
    }
}

/// Sticky values for a form that failed validation. Passwords are never echoed.
#[derive(Serialize, Default)]
pub struct FormView {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct PrincipalView {
    pub username: String,
    pub is_admin: bool,
    pub csrf_token: String,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        Self {
            username: principal.username.clone(),
            is_admin: principal.is_admin(),
            csrf_token: principal.csrf_token.clone(),
        }
    }
}
