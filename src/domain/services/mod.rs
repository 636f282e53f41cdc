pub mod auth_service;
pub mod bootstrap;
pub mod dispatch;
pub mod role_directory;
pub mod user_directory;
