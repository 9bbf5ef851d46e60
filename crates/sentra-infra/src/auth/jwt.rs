//! JWT token service implementation.
//!
//! Access tokens carry the full subject identity and a fixed role claim;
//! refresh tokens carry the subject id only. Both are HMAC-signed with a
//! process-wide secret loaded once at startup.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sentra_core::domain::User;
use sentra_core::ports::{AccessClaims, AuthError, RefreshClaims, TokenService};

/// Every account carries this flat role claim; there is no role engine.
const USER_ROLE: &str = "user";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl_hours: i64,
    pub refresh_ttl_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            issuer: "sentra-auth".to_string(),
            access_ttl_hours: 1,
            refresh_ttl_days: 7,
        }
    }
}

/// Access token claims as serialized into the JWT.
#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    sub: String, // user id
    name: String,
    email: String,
    roles: Vec<String>,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// Refresh token claims - subject id only.
#[derive(Debug, Serialize, Deserialize)]
struct RefreshTokenClaims {
    sub: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// JWT-based token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-production".to_string());

        if secret == "change-me-in-production" {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        let config = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "sentra-auth".to_string()),
            access_ttl_hours: std::env::var("JWT_ACCESS_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            refresh_ttl_days: std::env::var("JWT_REFRESH_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
        };
        Self::new(config)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation
    }

    fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.access_ttl_hours);

        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles: vec![USER_ROLE.to_string()],
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningError(e.to_string()))
    }

    fn issue_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::days(self.config.refresh_ttl_days);

        let claims = RefreshTokenClaims {
            sub: user.id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningError(e.to_string()))
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation())
            .map_err(Self::map_decode_error)?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AccessClaims {
            user_id,
            name: token_data.claims.name,
            email: token_data.claims.email,
            roles: token_data.claims.roles,
            exp: token_data.claims.exp,
        })
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let token_data =
            decode::<RefreshTokenClaims>(token, &self.decoding_key, &self.validation())
                .map_err(Self::map_decode_error)?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(RefreshClaims {
            user_id,
            exp: token_data.claims.exp,
        })
    }

    fn access_ttl_seconds(&self) -> i64 {
        self.config.access_ttl_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            issuer: "test-issuer".to_string(),
            access_ttl_hours: 1,
            refresh_ttl_days: 7,
        }
    }

    fn test_user() -> User {
        User::new(
            "Ann".to_string(),
            "ann@x.com".to_string(),
            "$argon2$hash".to_string(),
        )
    }

    #[test]
    fn access_token_round_trips_subject_claims() {
        let service = JwtTokenService::new(test_config());
        let user = test_user();

        let token = service.issue_access_token(&user).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.roles, vec![USER_ROLE.to_string()]);
    }

    #[test]
    fn refresh_token_round_trips_subject_id() {
        let service = JwtTokenService::new(test_config());
        let user = test_user();

        let token = service.issue_refresh_token(&user).unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtTokenService::new(test_config());
        let mut token = service.issue_access_token(&test_user()).unwrap();
        token.push('x');

        let result = service.verify_access_token(&token);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtTokenService::new(test_config());

        let result = service.verify_refresh_token("not-a-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let issuer1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let issuer2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = issuer1.issue_access_token(&test_user()).unwrap();

        assert!(issuer2.verify_access_token(&token).is_err());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        // Negative TTL puts the expiry well past the default 60s leeway.
        let service = JwtTokenService::new(JwtConfig {
            access_ttl_hours: -2,
            ..test_config()
        });

        let token = service.issue_access_token(&test_user()).unwrap();
        let result = service.verify_access_token(&token);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = JwtTokenService::new(test_config());

        let refresh = service.issue_refresh_token(&test_user()).unwrap();

        // A refresh token lacks the identity claims an access token carries.
        assert!(service.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn access_ttl_seconds_reflects_config() {
        let service = JwtTokenService::new(test_config());

        assert_eq!(service.access_ttl_seconds(), 3600);
    }
}
