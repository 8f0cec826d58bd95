use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handler::auth_handler::{login_handler, refresh_token_handler, register_handler};
use crate::service::auth_service::AuthServiceImpl;

pub fn auth_router(service: Arc<AuthServiceImpl>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh-token", post(refresh_token_handler))
        .with_state(service)
}
