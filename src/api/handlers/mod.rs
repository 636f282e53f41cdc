pub mod admin;
pub mod auth;
pub mod dispatch;
pub mod health;
pub mod profile;
pub mod registration;
