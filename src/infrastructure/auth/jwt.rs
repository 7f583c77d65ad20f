//! JWT session token generation and validation

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt::Debug;

use crate::domain::session::{
    Identity, SessionClaims, SessionTokens, TokenError, MAX_TOKEN_TTL_SECONDS,
};
use crate::domain::DomainError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_seconds: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// Configuration with the standard 24 hour lifetime
    #[cfg(test)]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(secret, crate::domain::session::DEFAULT_TOKEN_TTL_SECONDS)
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// HMAC-signed session tokens
#[derive(Clone)]
pub struct JwtService {
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &ALGORITHM)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::configuration("Token signing secret cannot be empty"));
        }

        if config.ttl_seconds == 0 {
            return Err(DomainError::configuration("Token lifetime must be positive"));
        }

        if config.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(DomainError::configuration(format!(
                "Token lifetime cannot exceed {} seconds",
                MAX_TOKEN_TTL_SECONDS
            )));
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked in verify_at against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            ttl_seconds: config.ttl_seconds,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }
}

impl SessionTokens for JwtService {
    fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = SessionClaims::new(identity, now, self.ttl_seconds)?;

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        let claims = token_data.claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
