use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::log_requests::log_request_middleware;
use crate::{auth, docs, scores, AppState};

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/score", post(scores::add_score))
        .route("/scores", get(scores::get_top_scores))
        .route("/docs", get(docs::serve_docs))
        .layer(cors)
        .layer(middleware::from_fn(log_request_middleware))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.cors_allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use scored_common::*;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::credentials::test_hasher;
    use crate::database::create_test_db;

    async fn create_test_app() -> Router {
        create_test_app_with(Config::default()).await
    }

    async fn create_test_app_with(config: Config) -> Router {
        router(AppState {
            db: Arc::new(create_test_db().await),
            hasher: test_hasher(),
            config: Arc::new(config),
        })
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, username: &str, password: &str) -> Response {
        post_json(app, "/register", serde_json::json!({ "username": username, "password": password })).await
    }

    async fn login(app: &Router, username: &str, password: &str) -> Response {
        post_json(app, "/login", serde_json::json!({ "username": username, "password": password })).await
    }

    #[tokio::test]
    async fn test_register_conflict_and_login() {
        let app = create_test_app().await;

        let response = register(&app, "alice", "pw1").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let registered: RegisterResponse = read_json(response).await;
        assert_eq!(registered.username, "alice");

        let response = register(&app, "alice", "pw2").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.error, "username already taken");

        let response = login(&app, "alice", "pw1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let logged_in: LoginResponse = read_json(response).await;
        assert_eq!(logged_in.user_id, registered.user_id);
        assert_eq!(logged_in.username, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_response() {
        let app = create_test_app().await;
        register(&app, "alice", "pw1").await;

        let unknown = login(&app, "nobody", "pw1").await;
        let wrong = login(&app, "alice", "pw2").await;

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let unknown: ErrorResponse = read_json(unknown).await;
        let wrong: ErrorResponse = read_json(wrong).await;
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        let app = create_test_app().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post_json(&app, "/login", serde_json::json!({ "username": "alice" })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post_json(&app, "/score", serde_json::json!({ "user_id": "one", "score": 5 })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let app = create_test_app().await;

        let response = get(&app, "/register").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = post_json(&app, "/scores", serde_json::json!({})).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_scores_flow() {
        let app = create_test_app().await;

        let mut ids = Vec::new();
        for (name, score) in [("u1", 50), ("u2", 90), ("u3", 10), ("u4", 90)] {
            let registered: RegisterResponse = read_json(register(&app, name, "pw").await).await;
            let response = post_json(
                &app,
                "/score",
                serde_json::json!({ "user_id": registered.user_id, "score": score }),
            ).await;
            assert_eq!(response.status(), StatusCode::CREATED);
            let ack: ScoreResponse = read_json(response).await;
            assert_eq!(ack.score, score);
            ids.push(registered.user_id);
        }

        let response = get(&app, "/scores").await;
        assert_eq!(response.status(), StatusCode::OK);
        let entries: Vec<ScoreEntry> = read_json(response).await;

        assert!(entries.len() <= 10);
        assert_eq!(entries.iter().map(|e| e.score).collect::<Vec<_>>(), vec![90, 90, 50, 10]);
        assert_eq!(entries[0], ScoreEntry { user_id: ids[1], username: "u2".into(), score: 90 });
        assert_eq!(entries[3].username, "u3");

        let entries: Vec<ScoreEntry> = read_json(get(&app, "/scores?limit=2").await).await;
        assert_eq!(entries.len(), 2);

        let response = get(&app, "/scores?limit=many").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_configured_default_limit() {
        let app = create_test_app_with(Config { top_scores_limit: 2, ..Config::default() }).await;
        let registered: RegisterResponse = read_json(register(&app, "alice", "pw").await).await;
        for score in [1, 2, 3] {
            post_json(&app, "/score", serde_json::json!({ "user_id": registered.user_id, "score": score })).await;
        }

        let entries: Vec<ScoreEntry> = read_json(get(&app, "/scores").await).await;
        assert_eq!(entries.iter().map(|e| e.score).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[tokio::test]
    async fn test_empty_leaderboard_is_an_empty_list() {
        let app = create_test_app().await;
        let entries: Vec<ScoreEntry> = read_json(get(&app, "/scores").await).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_score_for_unknown_user() {
        let app = create_test_app().await;
        let response = post_json(&app, "/score", serde_json::json!({ "user_id": 12345, "score": 1 })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.error, "unknown user");
    }

    #[tokio::test]
    async fn test_docs_page() {
        let app = create_test_app().await;
        let response = get(&app, "/docs").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/register"));
        assert!(html.contains("/scores"));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = create_test_app_with(Config {
            cors_allowed_origins: vec!["https://game.example".to_string()],
            ..Config::default()
        }).await;

        let request = Request::builder()
            .uri("/scores")
            .header(header::ORIGIN, "https://game.example")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://game.example"
        );

        let request = Request::builder()
            .uri("/scores")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
