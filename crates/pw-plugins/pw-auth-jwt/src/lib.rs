//! # pw-auth-jwt
//!
//! Argon2 + JWT implementation of `AuthProvider`.
//! Handles password hashing and the access/refresh token pair used by the API.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pw_core::error::{AppError, Result};
use pw_core::models::{TokenKind, TokenPair, User, VerifiedToken};
use pw_core::traits::AuthProvider;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clock skew tolerated when checking `exp`, in seconds.
const LEEWAY_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    token_type: TokenKind,
    exp: i64,
    iat: i64,
    jti: String,
    /// The user's external uuid.
    sub: Uuid,
}

pub struct JwtAuthProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtAuthProvider {
    /// Signs with HS256 using the shared secret.
    pub fn new(secret: &SecretString, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    fn encode(&self, subject: Uuid, kind: TokenKind) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();
        let claims = Claims {
            token_type: kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
            sub: subject,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to encode jwt: {e}")))
    }

    fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token.trim(), &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("token is expired".to_string())
                }
                _ => AppError::Unauthorized("token is invalid".to_string()),
            })
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
        })
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("stored password hash is unreadable: {e}");
                    return false;
                }
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            refresh: self.encode(user.uuid, TokenKind::Refresh)?,
            access: self.encode(user.uuid, TokenKind::Access)?,
        })
    }

    fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self.decode(refresh_token)?;
        if claims.token_type != TokenKind::Refresh {
            return Err(AppError::Unauthorized("token has wrong type".to_string()));
        }
        self.encode(claims.sub, TokenKind::Access)
    }

    fn verify(&self, token: &str) -> Result<VerifiedToken> {
        let claims = self.decode(token)?;
        Ok(VerifiedToken {
            subject: claims.sub,
            kind: claims.token_type,
        })
    }
}
