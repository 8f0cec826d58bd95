use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::dto::profile_dto::UserView;
use crate::dto::staff_dto::{ListQuery, StaffApprovalRequest, StaffNotificationRequest};
use crate::dto::ApiResponse;
use crate::middlewares::auth_middleware::AuthedUser;
use crate::model::user::NotificationKind;
use crate::service::notification_service::{NotificationService, NotificationServiceImpl};
use crate::service::staff_service::{StaffService, StaffServiceImpl};
use crate::util::error::HandlerError;

#[derive(Clone)]
pub struct StaffHandlerState {
    pub staff_service: Arc<StaffServiceImpl>,
    pub notification_service: Arc<NotificationServiceImpl>,
}

pub async fn dashboard_handler(
    State(state): State<StaffHandlerState>,
) -> Result<impl IntoResponse, HandlerError> {
    let counts = state.staff_service.dashboard().await?;
    Ok(Json(ApiResponse::success("Dashboard", counts)))
}

pub async fn list_users_handler(
    State(state): State<StaffHandlerState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = state.staff_service.list_users(query.page(), query.limit()).await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();
    Ok(Json(ApiResponse::success("Users", views)))
}

pub async fn set_staff_approval_handler(
    State(state): State<StaffHandlerState>,
    Path(user_id): Path<String>,
    Json(payload): Json<StaffApprovalRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let updated = state
        .staff_service
        .set_staff_approval(&user_id, payload.approved)
        .await?;
    Ok(Json(ApiResponse::success(
        "Staff approval updated",
        UserView::from(updated),
    )))
}

pub async fn send_notification_handler(
    State(state): State<StaffHandlerState>,
    Extension(AuthedUser(staff)): Extension<AuthedUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<StaffNotificationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let kind = payload.kind.unwrap_or(NotificationKind::Event);
    state
        .notification_service
        .notify_from_staff(&staff, &user_id, payload.message, kind)
        .await?;
    Ok(Json(ApiResponse::<()>::message_only("Notification sent")))
}
