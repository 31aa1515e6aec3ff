use crate::domain::models::{auth::Claims, user::User};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use uuid::Uuid;
use chrono::{Utc, Duration};
use tracing::error;

pub const TOKEN_AUDIENCE: &str = "ticketing-api";
pub const TOKEN_LIFETIME_MINUTES: i64 = 60;

pub struct AuthService {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self {
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        self.issue_token_with_lifetime(user, Duration::minutes(TOKEN_LIFETIME_MINUTES))
    }

    pub fn issue_token_with_lifetime(&self, user: &User, lifetime: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: (now + lifetime).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            role: user.role.clone(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }

    /// Checks signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthenticated("Token expired. Please log in again.".into())
                }
                _ => AppError::Unauthenticated("Invalid token.".into()),
            })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                error!("Stored password hash is unreadable: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, CloudinaryConfig};
    use crate::domain::models::user::Role;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            jwt_secret_key: include_str!("../../../tests/keys/test_private.pem").to_string(),
            jwt_public_key: include_str!("../../../tests/keys/test_public.pem").to_string(),
            auth_issuer: "test-issuer".to_string(),
            log_dir: "logs".to_string(),
            cache: CacheConfig::default(),
            cloudinary: CloudinaryConfig::default(),
        }
    }

    fn user() -> User {
        User::new("alice".into(), "alice@example.com".into(), "x".into(), Role::Admin)
    }

    #[test]
    fn issued_token_round_trips_subject_and_role() {
        let service = AuthService::new(&test_config()).unwrap();
        let user = user();
        let token = service.issue_token(&user).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.aud, TOKEN_AUDIENCE);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = AuthService::new(&test_config()).unwrap();
        let token = service.issue_token_with_lifetime(&user(), Duration::hours(-2)).unwrap();

        match service.verify(&token) {
            Err(AppError::Unauthenticated(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected expiry error, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn foreign_issuer_is_rejected_as_invalid() {
        let service = AuthService::new(&test_config()).unwrap();
        let mut other_config = test_config();
        other_config.auth_issuer = "someone-else".to_string();
        let other = AuthService::new(&other_config).unwrap();

        let token = other.issue_token(&user()).unwrap();
        match service.verify(&token) {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "Invalid token."),
            other => panic!("expected invalid token, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn password_hash_verifies_only_the_original_password() {
        let service = AuthService::new(&test_config()).unwrap();
        let hash = service.hash_password("correct horse").unwrap();

        assert!(service.verify_password("correct horse", &hash));
        assert!(!service.verify_password("battery staple", &hash));
        assert!(!service.verify_password("correct horse", "not-a-hash"));
    }
}
