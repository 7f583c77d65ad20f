//! Session domain
//!
//! Identity claims carried by bearer tokens and the contract for issuing and
//! verifying them. Tokens are self-contained: nothing about an issued token is
//! stored server-side.

mod claims;
mod error;

pub use claims::{Identity, SessionClaims, DEFAULT_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS};
pub use error::TokenError;

use chrono::{DateTime, Utc};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Issues and verifies signed, time-limited session tokens
pub trait SessionTokens: Send + Sync + Debug {
    /// Issue a token for the identity, valid from `now` for the configured TTL
    fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, DomainError>;

    /// Verify a token's signature and expiry as of `now`
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;

    /// Lifetime of issued tokens, in seconds
    fn ttl_seconds(&self) -> u64;

    fn issue(&self, identity: &Identity) -> Result<String, DomainError> {
        self.issue_at(identity, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }
}
