//! Shared helpers for API integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use cura_core::attributes::{SearchQueries, VisualAttributes};
use cura_pipeline::SearchPipeline;
use cura_vision::{AttributeExtractor, ExtractionRequest, VisionError};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cura_api::config::ServerConfig;
use cura_api::router::build_app_router;
use cura_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Attributes the stub extractor "sees" in every query image: khaki linen
/// wide-leg trousers.
pub fn stub_attributes() -> VisualAttributes {
    VisualAttributes {
        item_type: Some("pants".to_string()),
        fabric_type: Some("linen".to_string()),
        primary_colors: vec!["khaki".to_string()],
        silhouette: Some("wide-leg".to_string()),
        search_queries: SearchQueries {
            primary: Some("linen trousers".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Extractor returning [`stub_attributes`] without touching the network.
struct StubExtractor;

#[async_trait]
impl AttributeExtractor for StubExtractor {
    async fn extract(&self, _request: &ExtractionRequest) -> Result<VisualAttributes, VisionError> {
        Ok(stub_attributes())
    }
}

/// Build the full application router with all middleware layers, wired to
/// the given pool and a stub attribute extractor.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let pipeline = Arc::new(SearchPipeline::new(pool.clone(), Arc::new(StubExtractor)));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without identity.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request as the given user.
pub async fn authed_get(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("x-user-id", user_id)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON request with the given method as the given user.
pub async fn authed_json(
    app: Router,
    method: &str,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user_id)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll a session until it leaves the in-flight states, returning its final
/// status projection. Panics if it never settles.
pub async fn wait_for_terminal(app: &Router, user_id: &str, search_id: i64) -> serde_json::Value {
    for _ in 0..100 {
        let response = authed_get(
            app.clone(),
            &format!("/api/v1/searches/{search_id}"),
            user_id,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let status = json["data"]["status"].as_str().unwrap();
        if matches!(status, "completed" | "no_matches" | "failed") {
            return json;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("search {search_id} never reached a terminal status");
}
