use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    Extension,
};

use crate::dto::ApiResponse;
use crate::middlewares::auth_middleware::AuthedUser;
use crate::service::notification_service::{NotificationService, NotificationServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_notifications_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let notifications = service.list(&user.user_id).await?;
    Ok(Json(ApiResponse::success("Notifications", notifications)))
}

pub async fn mark_read_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.mark_read(&user.user_id, &notification_id).await?;
    Ok(Json(ApiResponse::<()>::message_only("Notification marked as read")))
}

pub async fn mark_all_read_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let marked = service.mark_all_read(&user.user_id).await?;
    Ok(Json(ApiResponse::success(
        format!("{} notifications marked as read", marked),
        marked,
    )))
}
