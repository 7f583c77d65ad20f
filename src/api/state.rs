//! Application state for shared services

use std::sync::Arc;

use crate::domain::SessionTokens;
use crate::infrastructure::user::UserService;

/// Services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub session_tokens: Arc<dyn SessionTokens>,
}

impl AppState {
    pub fn new(user_service: UserService, session_tokens: Arc<dyn SessionTokens>) -> Self {
        Self {
            user_service: Arc::new(user_service),
            session_tokens,
        }
    }
}
