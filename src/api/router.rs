use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::login;
use super::middleware::logging_middleware;
use super::protected;
use super::state::AppState;

/// Build the full router
///
/// Every request is bounded by `request_timeout`; dropping the handler
/// future cancels any in-flight backend call.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(login::create_login_router())
        .merge(protected::create_protected_router(state.clone()))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, Response};
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;

    use crate::infrastructure::auth::{
        ManualClock, TokenService, TokenServiceConfig, DEFAULT_SECRET_NAME,
    };
    use crate::infrastructure::events::InMemoryEventPublisher;
    use crate::infrastructure::login::{InMemoryLoginStore, LoginService, LoginServiceConfig};
    use crate::infrastructure::secrets::InMemorySecretFetcher;

    struct TestApp {
        router: Router,
        state: AppState,
        clock: Arc<ManualClock>,
        secrets: Arc<InMemorySecretFetcher>,
        publisher: Arc<InMemoryEventPublisher>,
    }

    fn test_app() -> TestApp {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let login_service = LoginService::new(
            Arc::new(InMemoryLoginStore::new()),
            publisher.clone(),
            LoginServiceConfig::default(),
        );

        let secrets =
            Arc::new(InMemorySecretFetcher::new().with_secret(DEFAULT_SECRET_NAME, "router-test-key"));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        ));
        let token_service =
            TokenService::new(secrets.clone(), clock.clone(), TokenServiceConfig::default());

        let state = AppState::new(Arc::new(login_service), Arc::new(token_service));
        let router = create_router(state.clone(), Duration::from_secs(10));

        TestApp {
            router,
            state,
            clock,
            secrets,
            publisher,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    fn credentials(method: Method, uri: &str, username: &str, password: &str) -> Request<Body> {
        let body = serde_json::json!({ "username": username, "password": password });
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_auth(method: Method, uri: &str, authorization: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn register_and_login(app: &TestApp, username: &str, password: &str) -> String {
        let response = send(
            &app.router,
            credentials(Method::POST, "/login/add", username, password),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", username, password),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_string(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder().uri("/login/add").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = send(
            &app.router,
            Request::builder().uri("/login").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = send(
            &app.router,
            Request::builder()
                .method(Method::POST)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let app = test_app();

        let token = register_and_login(&app, "hello@test.com", "password").await;
        assert_eq!(token.split('.').count(), 3);

        let response = send(
            &app.router,
            with_auth(Method::GET, "/testauth", &format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let published = app.publisher.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1, "created: hello@test.com");
    }

    #[tokio::test]
    async fn test_login_returns_plain_text_token() {
        let app = test_app();
        send(
            &app.router,
            credentials(Method::POST, "/login/add", "hello@test.com", "password"),
        )
        .await;

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "hello@test.com", "password"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_add_login_rejects_bad_input() {
        let app = test_app();

        let response = send(
            &app.router,
            credentials(Method::POST, "/login/add", "not-an-email", "password"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app.router,
            Request::builder()
                .method(Method::POST)
                .uri("/login/add")
                .body(Body::from("{\"username\":"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let app = test_app();
        register_and_login(&app, "hello@test.com", "password").await;

        let response = send(
            &app.router,
            credentials(Method::POST, "/login/add", "hello@test.com", "other"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Original password still works
        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "hello@test.com", "password"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let app = test_app();
        register_and_login(&app, "hello@test.com", "password").await;

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "hello@test.com", "wrongpass"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "nobody@test.com", "password"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "", "password"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_without_signing_key() {
        let app = test_app();
        send(
            &app.router,
            credentials(Method::POST, "/login/add", "hello@test.com", "password"),
        )
        .await;
        app.secrets.remove_secret(DEFAULT_SECRET_NAME);

        let response = send(
            &app.router,
            credentials(Method::POST, "/login", "hello@test.com", "password"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_protected_without_header() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder().uri("/testauth").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_with_malformed_header() {
        let app = test_app();

        for value in ["garbage", "Token abc", "Bearer ", "Bearer a b"] {
            let response = send(&app.router, with_auth(Method::GET, "/testauth", value)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {:?}", value);
        }
    }

    #[tokio::test]
    async fn test_protected_with_bad_tokens() {
        let app = test_app();
        let token = register_and_login(&app, "hello@test.com", "password").await;

        let response = send(
            &app.router,
            with_auth(Method::GET, "/testauth", "Bearer not.a.token"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        app.secrets.set_secret(DEFAULT_SECRET_NAME, "rotated-key");
        let response = send(
            &app.router,
            with_auth(Method::GET, "/testauth", &format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let app = test_app();
        let token = register_and_login(&app, "hello@test.com", "password").await;

        app.clock.advance(chrono::Duration::hours(1));

        let response = send(
            &app.router,
            with_auth(Method::GET, "/testauth", &format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_shutdown_requires_token() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder()
                .method(Method::POST)
                .uri("/shutdown")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), app.state.shutdown.wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_triggers_handle() {
        let app = test_app();
        let token = register_and_login(&app, "hello@test.com", "password").await;

        let response = send(
            &app.router,
            with_auth(Method::POST, "/shutdown", &format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let waited = tokio::time::timeout(Duration::from_secs(1), app.state.shutdown.wait()).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
