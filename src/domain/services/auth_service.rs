use std::sync::Arc;
use crate::domain::{
    models::auth::{Claims, Credentials, RefreshTokenRecord, TokenPair, TOKEN_AUDIENCE},
    ports::AuthRepository,
};
use crate::error::AppError;
use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, config: Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::Configuration(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::Configuration(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self { repo, config, encoding_key, decoding_key })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AppError> {
        let family_id = Uuid::new_v4();
        self.issue_token_pair(credentials, family_id, 1).await
    }

    /// Looks up the stored refresh token so the caller can reload the account.
    pub async fn find_refresh(&self, raw_refresh_token: &str) -> Result<RefreshTokenRecord, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)
    }

    pub async fn refresh(&self, raw_refresh_token: &str, credentials: &Credentials) -> Result<TokenPair, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        if record.expires_at < Utc::now() {
            self.repo.delete_refresh_token(&token_hash).await?;
            return Err(AppError::Unauthorized);
        }

        if record.used {
            tracing::warn!(
                user_id = record.user_id,
                "Rotated refresh token presented again, revoking family {}", record.family_id
            );
            self.repo.delete_refresh_family(record.family_id).await?;
            return Err(AppError::Unauthorized);
        }

        self.repo.mark_refresh_token_used(&token_hash).await?;
        self.issue_token_pair(credentials, record.family_id, record.generation_id + 1).await
    }

    /// Revokes every token descended from the same login.
    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        match self.repo.find_refresh_token(&token_hash).await? {
            Some(record) => self.repo.delete_refresh_family(record.family_id).await,
            None => Ok(()),
        }
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    async fn issue_token_pair(&self, credentials: &Credentials, family_id: Uuid, generation_id: i32) -> Result<TokenPair, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.access_token_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: credentials.user_id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            username: credentials.username.clone(),
            authorities: credentials.authorities.clone(),
            csrf: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: self.hash_token(&refresh_token),
            user_id: credentials.user_id,
            family_id,
            generation_id,
            used: false,
            expires_at: now + Duration::days(7),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok(TokenPair { access_token, refresh_token, csrf_token })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
