use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub access_token_minutes: i64,
    pub cookie_secure: bool,
    pub default_role: String,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://user-admin.local".to_string()),
            access_token_minutes: env::var("ACCESS_TOKEN_MINUTES").unwrap_or_else(|_| "60".to_string()).parse().expect("ACCESS_TOKEN_MINUTES must be a number"),
            cookie_secure: env::var("COOKIE_SECURE").map(|v| v != "false" && v != "0").unwrap_or(true),
            default_role: env::var("DEFAULT_ROLE").unwrap_or_else(|_| "ROLE_USER".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
        }
    }
}
