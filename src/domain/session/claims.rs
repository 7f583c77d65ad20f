//! Session claims embedded in bearer tokens

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::domain::DomainError;

/// Token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Longest accepted token lifetime: 10 years
pub const MAX_TOKEN_TTL_SECONDS: u64 = 315_360_000;

/// The identity a session token is issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(user.id().as_str(), user.name(), user.email())
    }
}

/// Claims carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for an identity issued at `issued_at`
    ///
    /// Fails when the expiry falls outside the representable time range.
    pub fn new(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl_seconds: u64,
    ) -> Result<Self, DomainError> {
        let exp = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "Token lifetime of {} seconds is out of range",
                    ttl_seconds
                ))
            })?;

        Ok(Self {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// A token is expired once `now` reaches its expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn identity(&self) -> Identity {
        Identity::new(&self.sub, &self.name, &self.email)
    }
}
