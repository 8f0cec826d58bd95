use std::sync::Arc;

use axum::{middleware, routing::{get, patch}, Router};

use crate::handler::notification_handler::{
    list_notifications_handler, mark_all_read_handler, mark_read_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::notification_service::NotificationServiceImpl;

pub fn notification_router(service: Arc<NotificationServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/notifications", get(list_notifications_handler))
        .route("/api/notifications/mark-all-read", patch(mark_all_read_handler))
        .route("/api/notifications/{notification_id}/read", patch(mark_read_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
