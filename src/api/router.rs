use std::path::Path;

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::auth;
use super::health;
use super::middleware::{logging_middleware, timeout_middleware, RequestTimeout};
use super::state::AppState;
use super::types::error::NOT_FOUND_MESSAGE;
use crate::config::ServerConfig;

/// Create the full router with application state
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::create_auth_router(&state));

    let router = match config.static_dir.as_deref() {
        Some(dir) => router.fallback_service(
            ServeDir::new(Path::new(dir)).not_found_service(not_found.into_service()),
        ),
        None => router.fallback(not_found),
    };

    router
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            RequestTimeout::from_secs(config.request_timeout_secs),
            timeout_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
    }
}

/// Plain-text 404 for paths no route or static file matches
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        response::Response,
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::types::error::{
        INVALID_CREDENTIALS_MESSAGE, INVALID_TOKEN_MESSAGE, MISSING_TOKEN_MESSAGE,
    };
    use crate::domain::{Identity, SessionTokens};
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    const SECRET: &str = "router-test-secret";

    fn test_state() -> AppState {
        let user_service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        );
        let tokens = JwtService::new(JwtConfig::with_secret(SECRET)).unwrap();

        AppState::new(user_service, Arc::new(tokens))
    }

    fn test_app() -> Router {
        create_router(test_state(), &ServerConfig::default())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_me(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn registration() -> Value {
        json!({ "email": "user@email.com", "name": "User name", "password": "szjkdjklkjdz" })
    }

    async fn login_token(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "email": "user@email.com", "password": "szjkdjklkjdz" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn register_and_login(app: &Router) -> String {
        let response = app.clone().oneshot(post_json("/user", registration())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        login_token(app).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_returns_user_without_hash() {
        let response = test_app().oneshot(post_json("/user", registration())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "user@email.com");
        assert_eq!(body["name"], "User name");
        assert!(body["id"].is_string());
        assert!(body["created_at"].is_string());
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let state = test_state();
        let app = create_router(state.clone(), &ServerConfig::default());

        app.clone().oneshot(post_json("/user", registration())).await.unwrap();
        let response = app.oneshot(post_json("/user", registration())).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(state.user_service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_missing_field() {
        let response = test_app()
            .oneshot(post_json("/user", json!({ "email": "user@email.com", "name": "x" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = test_app();
        let token = register_and_login(&app).await;

        let response = app
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "user@email.com");
        assert_eq!(body["name"], "User name");
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_login_claims_match_registered_user() {
        let state = test_state();
        let app = create_router(state.clone(), &ServerConfig::default());

        let response = app.clone().oneshot(post_json("/user", registration())).await.unwrap();
        let user_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let token = login_token(&app).await;
        let claims = state.session_tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@email.com");
        assert_eq!(claims.name, "User name");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = test_app();
        app.clone().oneshot(post_json("/user", registration())).await.unwrap();

        let response = app
            .oneshot(post_json(
                "/login",
                json!({ "email": "user@email.com", "password": "wrong" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": INVALID_CREDENTIALS_MESSAGE })
        );
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let response = test_app()
            .oneshot(post_json(
                "/login",
                json!({ "email": "nobody@email.com", "password": "szjkdjklkjdz" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": INVALID_CREDENTIALS_MESSAGE })
        );
    }

    #[tokio::test]
    async fn test_me_without_header() {
        let response = test_app().oneshot(get_me(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": MISSING_TOKEN_MESSAGE }));
    }

    #[tokio::test]
    async fn test_me_with_garbage_token() {
        let response = test_app()
            .oneshot(get_me(Some("Bearer garbage")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": INVALID_TOKEN_MESSAGE }));
    }

    #[tokio::test]
    async fn test_me_with_wrong_scheme() {
        let response = test_app()
            .oneshot(get_me(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": INVALID_TOKEN_MESSAGE }));
    }

    #[tokio::test]
    async fn test_me_with_foreign_token() {
        let foreign = JwtService::new(JwtConfig::with_secret("another-secret")).unwrap();
        let token = foreign
            .issue(&Identity::new("user-1", "User name", "user@email.com"))
            .unwrap();

        let response = test_app()
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_expired_token() {
        let state = test_state();
        let issued = Utc::now() - Duration::seconds(86_401);
        let token = state
            .session_tokens
            .issue_at(&Identity::new("user-1", "User name", "user@email.com"), issued)
            .unwrap();

        let response = create_router(state, &ServerConfig::default())
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": INVALID_TOKEN_MESSAGE }));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_static_dir_fallback() {
        let dir = std::env::temp_dir().join(format!("account-api-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>docs</h1>").unwrap();

        let config = ServerConfig {
            static_dir: Some(dir.to_string_lossy().into_owned()),
            ..ServerConfig::default()
        };
        let app = create_router(test_state(), &config);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>docs</h1>");

        let response = app
            .oneshot(Request::builder().uri("/missing.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, NOT_FOUND_MESSAGE);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/login")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
