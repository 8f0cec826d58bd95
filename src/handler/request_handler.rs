use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::dto::request_dto::{
    CreateRequestRequest, FulfillRequestRequest, UpdateRequestDetailsRequest,
    UpdateRequestStatusRequest,
};
use crate::model::request::RequestStatus;
use crate::dto::staff_dto::ListQuery;
use crate::dto::ApiResponse;
use crate::middlewares::auth_middleware::AuthedUser;
use crate::service::request_service::{RequestService, RequestServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_request_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let mut request = payload
        .into_request(&user.user_id)
        .map_err(HandlerError::bad_request)?;
    request.user_object_id = user.id;
    let created = service.create(request).await?;
    Ok(Json(ApiResponse::success("Request created", created)))
}

pub async fn list_my_requests_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let requests = service.list_for_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success("Requests", requests)))
}

pub async fn list_all_requests_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let requests = service.list(query.page(), query.limit()).await?;
    Ok(Json(ApiResponse::success("Requests", requests)))
}

pub async fn get_request_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let request = service.get(&request_id).await?;
    if request.user_id != user.user_id && !user.is_approved_staff() {
        return Err(HandlerError::not_found(format!("Request not found: {}", request_id)));
    }
    Ok(Json(ApiResponse::success("Request", request)))
}

/// Owners may edit details while the request is still pending; approved
/// staff may edit at any point.
pub async fn update_request_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateRequestDetailsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let request = service.get(&request_id).await?;
    if request.user_id != user.user_id && !user.is_approved_staff() {
        return Err(HandlerError::not_found(format!("Request not found: {}", request_id)));
    }
    if request.user_id == user.user_id
        && !user.is_approved_staff()
        && request.status != RequestStatus::Pending
    {
        return Err(HandlerError::bad_request(
            "Only pending requests can be edited",
        ));
    }
    let updated = service.update_details(&request_id, payload).await?;
    Ok(Json(ApiResponse::success("Request updated", updated)))
}

pub async fn update_request_status_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateRequestStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let status = payload.parse_status().map_err(HandlerError::bad_request)?;
    let updated = service.update_status(&request_id, status).await?;
    Ok(Json(ApiResponse::success("Request status updated", updated)))
}

pub async fn fulfill_request_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Path(request_id): Path<String>,
    Json(payload): Json<FulfillRequestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let updated = service.fulfill(&request_id, payload.into_entry()).await?;
    Ok(Json(ApiResponse::success("Fulfillment recorded", updated)))
}

/// Deletion shares the `{request_id}` route with the owner-facing GET, so
/// the staff check happens here instead of in a route layer.
pub async fn delete_request_handler(
    State(service): State<Arc<RequestServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    if !user.is_approved_staff() {
        return Err(HandlerError::forbidden("Staff access required"));
    }
    service.delete(&request_id).await?;
    Ok(Json(ApiResponse::<()>::message_only("Request deleted")))
}
