//! Account API endpoints
//!
//! Registration, login, and the session-protected profile endpoint.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::{require_session, CurrentSession};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Identity, User};
use crate::infrastructure::user::RegisterUserRequest;

/// Create the account router
///
/// Only `/me` sits behind the session gate.
pub fn create_auth_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/user", post(register))
        .route("/login", post(login))
        .merge(protected)
}

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Stored user as exposed over HTTP
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// Identity decoded from the session token
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<Identity> for MeResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            name: identity.name,
        }
    }
}

/// Register a new user
///
/// POST /user
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            name: request.name,
            password: request.password,
        })
        .await?;

    info!(user_id = %user.id(), "User registered");

    Ok(Json(UserResponse::from(&user)))
}

/// Exchange credentials for a session token
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.session_tokens.issue(&Identity::from(&user))?;

    info!(
        user_id = %user.id(),
        expires_in = state.session_tokens.ttl_seconds(),
        "User logged in"
    );

    Ok(Json(LoginResponse { token }))
}

/// Return the identity carried by the verified token
///
/// GET /me
pub async fn me(CurrentSession(claims): CurrentSession) -> Json<MeResponse> {
    Json(MeResponse::from(claims.identity()))
}
