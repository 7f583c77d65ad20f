//! Authentication infrastructure module
//!
//! This module provides JWT session tokens for user authentication.

mod jwt;

pub use jwt::{JwtConfig, JwtService};
