use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::dto::donation_dto::{
    CreateDonationRequest, UpdateDonationDetailsRequest, UpdateDonationStatusRequest,
};
use crate::model::donation::DonationStatus;
use crate::dto::staff_dto::ListQuery;
use crate::dto::ApiResponse;
use crate::middlewares::auth_middleware::AuthedUser;
use crate::service::donation_service::{DonationService, DonationServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_donation_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<CreateDonationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let donation = payload
        .into_donation(&user.user_id, user.name.clone())
        .map_err(HandlerError::bad_request)?;
    let created = service.create(donation).await?;
    Ok(Json(ApiResponse::success("Donation created", created)))
}

pub async fn list_my_donations_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let donations = service.list_for_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success("Donations", donations)))
}

pub async fn list_all_donations_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let donations = service.list(query.page(), query.limit()).await?;
    Ok(Json(ApiResponse::success("Donations", donations)))
}

pub async fn get_donation_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(donation_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let donation = service.get(&donation_id).await?;
    // Owners and approved staff only.
    if donation.user_id != user.user_id && !user.is_approved_staff() {
        return Err(HandlerError::not_found(format!("Donation not found: {}", donation_id)));
    }
    Ok(Json(ApiResponse::success("Donation", donation)))
}

/// Owners may edit details while the donation is still pending; approved
/// staff may edit at any point.
pub async fn update_donation_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(donation_id): Path<String>,
    Json(payload): Json<UpdateDonationDetailsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let donation = service.get(&donation_id).await?;
    if donation.user_id != user.user_id && !user.is_approved_staff() {
        return Err(HandlerError::not_found(format!("Donation not found: {}", donation_id)));
    }
    if donation.user_id == user.user_id
        && !user.is_approved_staff()
        && donation.status != DonationStatus::Pending
    {
        return Err(HandlerError::bad_request(
            "Only pending donations can be edited",
        ));
    }
    let updated = service.update_details(&donation_id, payload).await?;
    Ok(Json(ApiResponse::success("Donation updated", updated)))
}

pub async fn update_donation_status_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Path(donation_id): Path<String>,
    Json(payload): Json<UpdateDonationStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let status = payload.parse_status().map_err(HandlerError::bad_request)?;
    let updated = service.update_status(&donation_id, status, payload.notes).await?;
    Ok(Json(ApiResponse::success("Donation status updated", updated)))
}

/// Deletion shares the `{donation_id}` route with the owner-facing GET, so
/// the staff check happens here instead of in a route layer.
pub async fn delete_donation_handler(
    State(service): State<Arc<DonationServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(donation_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    if !user.is_approved_staff() {
        return Err(HandlerError::forbidden("Staff access required"));
    }
    service.delete(&donation_id).await?;
    Ok(Json(ApiResponse::<()>::message_only("Donation deleted")))
}
