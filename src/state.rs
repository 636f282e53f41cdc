use std::sync::Arc;
use crate::domain::services::{
    auth_service::AuthService, role_directory::RoleDirectory, user_directory::UserDirectory,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub role_directory: Arc<RoleDirectory>,
    pub user_directory: Arc<UserDirectory>,
    pub auth_service: Arc<AuthService>,
    pub templates: Arc<Tera>,
}
