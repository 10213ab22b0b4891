//! HTTP front end tests, driving the router directly without a listener.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;
use travelmap::server;
use travelmap::store::{MemoryStore, StoreError, StoreResult, VisitRecord, VisitStore};

fn app() -> Router {
    server::router(Arc::new(MemoryStore::new())).expect("router should build")
}

/// Store whose every operation fails, for exercising handler error mapping.
struct BrokenStore;

#[async_trait]
impl VisitStore for BrokenStore {
    async fn save(&self, country: &str) -> StoreResult<u64> {
        Err(StoreError::service("update item", country, "table unavailable"))
    }

    async fn results(&self) -> StoreResult<Vec<VisitRecord>> {
        Err(StoreError::service("scan", "travels", "table unavailable"))
    }

    async fn unique_total(&self) -> StoreResult<u64> {
        Err(StoreError::service("scan", "travels", "table unavailable"))
    }
}

fn broken_app() -> Router {
    server::router(Arc::new(BrokenStore)).expect("router should build")
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_visit_country_counts_up() {
    let app = app();

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/visits/Turkey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({"Country": "Turkey", "Visit": 1})
    );

    let response = app
        .oneshot(request(Method::POST, "/visits/Turkey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"Country": "Turkey", "Visit": 2})
    );
}

#[tokio::test]
async fn test_visits_empty_store_is_empty_array() {
    let response = app()
        .oneshot(request(Method::GET, "/visits"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_visits_lists_every_saved_country() {
    let app = app();
    for country in ["Turkey", "Brazil", "Turkey"] {
        let response = app
            .clone()
            .oneshot(request(Method::POST, &format!("/visits/{country}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(request(Method::GET, "/visits")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut records = match body_json(response).await {
        Value::Array(records) => records,
        other => panic!("expected array, got {other}"),
    };
    records.sort_by_key(|r| r["Country"].as_str().unwrap().to_string());
    assert_eq!(
        records,
        vec![
            json!({"Country": "Brazil", "Visit": 1}),
            json!({"Country": "Turkey", "Visit": 2}),
        ]
    );
}

#[tokio::test]
async fn test_unique_visits_empty_store_is_zero() {
    let response = app()
        .oneshot(request(Method::GET, "/uniquevisits"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_json(response).await, json!({"Count": 0}));
}

#[tokio::test]
async fn test_unique_visits_counts_distinct_countries() {
    let app = app();
    for country in ["Turkey", "Turkey", "Brazil", "Japan"] {
        app.clone()
            .oneshot(request(Method::POST, &format!("/visits/{country}")))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(request(Method::GET, "/uniquevisits"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({"Count": 3}));
}

#[tokio::test]
async fn test_index_renders_unique_total() {
    let app = app();
    for country in ["Turkey", "Brazil"] {
        app.clone()
            .oneshot(request(Method::POST, &format!("/visits/{country}")))
            .await
            .unwrap();
    }

    let response = app.oneshot(request(Method::GET, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains(r#"<span class="emph">2</span>"#), "{html}");
}

#[tokio::test]
async fn test_save_failure_is_bad_request_with_empty_body() {
    let response = broken_app()
        .oneshot(request(Method::POST, "/visits/Turkey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_visits_failure_is_internal_error_with_empty_body() {
    let response = broken_app()
        .oneshot(request(Method::GET, "/visits"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_unique_visits_failure_is_bad_request_with_empty_body() {
    let response = broken_app()
        .oneshot(request(Method::GET, "/uniquevisits"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_index_failure_is_bad_request() {
    let response = broken_app()
        .oneshot(request(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_visit_country_requires_post() {
    let response = app()
        .oneshot(request(Method::GET, "/visits/Turkey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app()
        .oneshot(request(Method::GET, "/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_serves_map_script() {
    let response = app()
        .oneshot(request(Method::GET, "/static/travelmap.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
