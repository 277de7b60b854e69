use std::sync::Arc;

use argon2::Config as ArgonConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use uuid::Uuid;

use crate::errors::{AppError, AppResult, StoreError};
use crate::models::{AuthResult, Claims, LoginRequest, RegisterRequest, RegisteredUser, User};
use crate::store::CredentialStore;

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, plain: &str) -> AppResult<String>;
    fn matches(&self, plain: &str, hash: &str) -> bool;
}

/// Argon2 with a random 16 byte salt per password.
pub struct Argon2Encoder;

impl PasswordEncoder for Argon2Encoder {
    fn encode(&self, plain: &str) -> AppResult<String> {
        let salt: [u8; 16] = rand::thread_rng().gen();
        let config = ArgonConfig::default();

        argon2::hash_encoded(plain.as_bytes(), &salt, &config)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn matches(&self, plain: &str, hash: &str) -> bool {
        argon2::verify_encoded(hash, plain.as_bytes()).unwrap_or(false)
    }
}

pub trait TokenIssuer: Send + Sync {
    fn generate_token(&self, user: &User) -> AppResult<String>;
}

/// HS256 JWT issuer; also validates bearer tokens for the auth middleware.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        JwtTokenIssuer {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate_token(&self, user: &User) -> AppResult<String> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("Token expiry overflow".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: usize::try_from(expiration)
                .map_err(|_| AppError::Internal("Token expiry before epoch".to_string()))?,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to encode token: {}", e)))
    }
}

pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    encoder: Arc<dyn PasswordEncoder>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        encoder: Arc<dyn PasswordEncoder>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        AuthService { users, encoder, tokens }
    }

    pub async fn authenticate(&self, req: &LoginRequest) -> AppResult<AuthResult> {
        let user = match self.users.find_by_username(&req.username).await? {
            Some(user) => user,
            None => {
                log::warn!("Login rejected for unknown user {}", req.username);
                return Err(AppError::NotFound("User not found".to_string()));
            }
        };

        if !self.encoder.matches(&req.password, &user.password) {
            log::warn!("Login rejected for {}: wrong password", req.username);
            return Err(AppError::InvalidCredentials("Wrong password".to_string()));
        }

        let token = self.tokens.generate_token(&user)?;
        log::info!("User {} logged in", user.username);

        Ok(AuthResult {
            success: true,
            message: "Success".to_string(),
            token: Some(token),
        })
    }

    pub async fn register(&self, req: &RegisterRequest) -> AppResult<RegisteredUser> {
        if self.users.exists_by_username(&req.username).await? {
            return Err(AppError::DuplicateName("Username already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: req.username.clone(),
            password: self.encoder.encode(&req.password)?,
        };

        let user = self.users.insert(user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppError::DuplicateName("Username already exists".to_string()),
            other => other.into(),
        })?;
        log::info!("Registered user {}", user.username);

        Ok(RegisteredUser {
            id: user.id,
            username: user.username,
        })
    }
}
