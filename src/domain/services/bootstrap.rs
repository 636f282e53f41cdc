use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{
    models::{role::ROLE_ADMIN, user::NewUser},
    services::{role_directory::RoleDirectory, user_directory::UserDirectory},
};
use crate::error::AppError;

/// Makes sure the admin role and the admin account exist. Safe to run on
/// every start: existing rows are left untouched.
pub async fn ensure_admin(
    roles: &RoleDirectory,
    users: &UserDirectory,
    config: &Config,
) -> Result<(), AppError> {
    let admin_role = roles.ensure_role(ROLE_ADMIN).await?;

    match users.find_by_username(&config.admin_username).await {
        Ok(_) => info!("Admin account '{}' already present", config.admin_username),
        Err(AppError::NotFound(_)) => {
            let admin = NewUser {
                username: config.admin_username.clone(),
                password: config.admin_password.clone(),
                email: config.admin_email.clone(),
                role_ids: vec![admin_role.id],
                ..Default::default()
            };
            users.save(admin).await?;
            info!("Admin user created with username '{}'", config.admin_username);
        }
        Err(e) => return Err(e),
    }

    if roles.find_by_name(&config.default_role).await?.is_none() {
        warn!("Default role '{}' does not exist; registrations will fail until it is created", config.default_role);
    }

    Ok(())
}
