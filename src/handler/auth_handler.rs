use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Json, State},
    response::IntoResponse,
};
use std::net::SocketAddr;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::dto::ApiResponse;
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::util::error::HandlerError;

pub async fn register_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let response = service
        .register(
            payload.email,
            payload.password,
            payload.name,
            payload.register_as_staff.unwrap_or(false),
        )
        .await?;
    Ok(Json(ApiResponse::success("Account created", response)))
}

pub async fn login_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let response = service
        .login(payload.email, payload.password, Some(addr.ip().to_string()))
        .await?;
    Ok(Json(ApiResponse::success("Logged in", response)))
}

pub async fn refresh_token_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let tokens = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(ApiResponse::success("Token refreshed", tokens)))
}
