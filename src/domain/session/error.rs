use thiserror::Error;

/// Reasons a bearer token fails verification
///
/// Clients only ever see a generic "invalid token" response; the variants
/// exist for logs and tests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

