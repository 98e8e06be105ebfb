//! JWT token generation and validation
//!
//! Stateless bearer tokens: the claim set carries the subject (user email) and
//! an absolute expiry, signed with HS256 and the server-held secret. A token is
//! valid while `now < exp`; `now == exp` already counts as expired. Refresh goes
//! through full validation, so an expired token can never mint a new one.

use crate::config::AppConfig;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum secret length accepted for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user email)
    #[serde(default)]
    pub sub: Option<String>,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Token service errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("failed to encode token: {0}")]
    Encoding(String),

    #[error("invalid token configuration: {0}")]
    Config(String),
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from a raw secret and token lifetime
    pub fn new(secret: &str, access_token_exp_secs: u64) -> Result<Self, TokenError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        // Expiry is checked by hand against the caller's clock, without leeway
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_exp_secs,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, TokenError> {
        Self::new(
            config.security.jwt_secret.expose_secret(),
            config.security.access_token_exp_secs,
        )
    }

    /// Access token lifetime in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.access_token_exp_secs
    }

    /// Issue an access token for `subject`, expiring one TTL from now
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue an access token as if the current time were `now`
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expiration = now + Duration::seconds(self.access_token_exp_secs as i64);

        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        self.encode_claims(&claims)
    }

    /// Sign an arbitrary claim set
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Validate a token and return its subject
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against an explicit clock
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                TokenError::InvalidToken
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(TokenError::ExpiredToken);
        }

        match claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => {
                tracing::debug!("Token has no subject claim");
                Err(TokenError::InvalidToken)
            }
        }
    }

    /// Re-validate a token and issue a fresh one for the same subject
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        self.refresh_at(token, Utc::now())
    }

    /// Refresh against an explicit clock
    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let subject = self.validate_at(token, now)?;
        self.issue_at(&subject, now)
    }
}
