use sqlx::FromRow;

use crate::domain::models::{role::Role, user::User};

pub mod sqlite_auth_repo;
pub mod sqlite_role_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_role_repo;
pub mod postgres_user_repo;

pub(crate) const USER_COLUMNS: &str = "id, username, password_hash, name, surname, email, created_at";

/// One row of `user_roles` joined with its role.
#[derive(Debug, FromRow)]
pub(crate) struct MembershipRow {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
}

pub(crate) fn attach_roles(users: &mut [User], memberships: Vec<MembershipRow>) {
    for row in memberships {
        if let Some(user) = users.iter_mut().find(|u| u.id == row.user_id) {
            user.roles.push(Role { id: row.role_id, name: row.role_name });
        }
    }
}
