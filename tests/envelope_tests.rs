//! Response envelope contract: success bodies carry `status: "success"`,
//! client errors `"fail"`, server errors `"error"`.

use axum::{body::Body, http::Request, routing::get, Json, Router};
use serde_json::Value;
use tower::ServiceExt;

use lifelink_backend::dto::ApiResponse;
use lifelink_backend::util::error::HandlerError;

async fn ok_handler() -> Json<ApiResponse<u32>> {
    Json(ApiResponse::success("It worked", 42))
}

async fn not_found_handler() -> Result<Json<ApiResponse<()>>, HandlerError> {
    Err(HandlerError::not_found("Donation not found: BD-0000000"))
}

async fn internal_handler() -> Result<Json<ApiResponse<()>>, HandlerError> {
    Err(HandlerError::internal("Internal server error"))
}

fn test_router() -> Router {
    Router::new()
        .route("/ok", get(ok_handler))
        .route("/missing", get(not_found_handler))
        .route("/broken", get(internal_handler))
        .route("/health", get(|| async { "OK" }))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_success_envelope() {
    let response = test_router()
        .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "It worked");
    assert_eq!(json["data"], 42);
}

#[tokio::test]
async fn test_client_error_envelope_is_fail() {
    let response = test_router()
        .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let json = body_json(response).await;
    assert_eq!(json["status"], "fail");
    assert_eq!(json["message"], "Donation not found: BD-0000000");
}

#[tokio::test]
async fn test_server_error_envelope_is_error() {
    let response = test_router()
        .oneshot(Request::builder().uri("/broken").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_health_is_public_plaintext() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
