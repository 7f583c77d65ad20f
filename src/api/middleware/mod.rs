//! API middleware components

pub mod logging;
pub mod timeout;
pub mod user_auth;

pub use logging::logging_middleware;
pub use timeout::{timeout_middleware, RequestTimeout};
pub use user_auth::{extract_bearer_token, require_session, CurrentSession};
