use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, Json, Multipart, Path, State},
    http::{header::CONTENT_TYPE, Request},
    response::IntoResponse,
    Extension,
};
use bytes::Bytes;
use validator::Validate;

use crate::dto::profile_dto::{
    DocumentReviewRequest, KycDecision, KycReviewRequest, KycUploadLinkRequest, UpdateProfileRequest,
    UserView,
};
use crate::dto::ApiResponse;
use crate::middlewares::auth_middleware::AuthedUser;
use crate::service::profile_service::{ProfileService, ProfileServiceImpl};
use crate::util::error::HandlerError;

/// JSON bodies on the upload endpoint are capped well below the multipart
/// limit; they only ever carry a URL.
const UPLOAD_JSON_LIMIT: usize = 64 * 1024;

pub async fn get_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.get_profile(&user.user_id).await?;
    Ok(Json(ApiResponse::success("Profile", UserView::from(profile))))
}

pub async fn update_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let updated = service.update_profile(&user.user_id, payload).await?;
    Ok(Json(ApiResponse::success("Profile updated", UserView::from(updated))))
}

/// KYC upload accepts either a multipart file or a JSON body carrying an
/// already-hosted document URL, dispatched on the Content-Type header.
pub async fn upload_kyc_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    req: Request<Body>,
) -> Result<impl IntoResponse, HandlerError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let updated = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| HandlerError::bad_request(format!("Invalid multipart body: {}", e)))?;

        let mut file: Option<(String, Bytes)> = None;
        let mut document_type: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| HandlerError::bad_request(format!("Invalid multipart field: {}", e)))?
        {
            match field.name() {
                Some("file") | Some("document") => {
                    let filename = field
                        .file_name()
                        .map(|f| f.to_string())
                        .ok_or_else(|| HandlerError::bad_request("Uploaded file has no filename"))?;
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| HandlerError::bad_request(format!("Failed to read upload: {}", e)))?;
                    file = Some((filename, data));
                }
                Some("document_type") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| HandlerError::bad_request(format!("Invalid field: {}", e)))?;
                    document_type = Some(value);
                }
                _ => {}
            }
        }

        let (filename, data) =
            file.ok_or_else(|| HandlerError::bad_request("Missing 'file' field in upload"))?;
        service
            .upload_kyc_file(&user.user_id, &filename, data, document_type)
            .await?
    } else {
        let bytes = axum::body::to_bytes(req.into_body(), UPLOAD_JSON_LIMIT)
            .await
            .map_err(|e| HandlerError::bad_request(format!("Failed to read body: {}", e)))?;
        let payload: KycUploadLinkRequest = serde_json::from_slice(&bytes)
            .map_err(|e| HandlerError::bad_request(format!("Invalid JSON body: {}", e)))?;
        if let Err(e) = payload.validate() {
            return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
        }
        service
            .upload_kyc_link(&user.user_id, payload.url, payload.document_type)
            .await?
    };

    Ok(Json(ApiResponse::success(
        "KYC document uploaded",
        UserView::from(updated),
    )))
}

pub async fn review_kyc_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(AuthedUser(reviewer)): Extension<AuthedUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<KycReviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let decision = KycDecision::parse(&payload.status, payload.rejection_reason.as_deref())
        .map_err(HandlerError::bad_request)?;
    let updated = service.review_kyc(&reviewer, &user_id, decision).await?;
    Ok(Json(ApiResponse::success("KYC review recorded", UserView::from(updated))))
}

pub async fn review_document_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(AuthedUser(reviewer)): Extension<AuthedUser>,
    Path((user_id, document_id)): Path<(String, String)>,
    Json(payload): Json<DocumentReviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let status = payload.parse_status().map_err(HandlerError::bad_request)?;
    let updated = service
        .review_document(&reviewer, &user_id, &document_id, status, payload.rejection_reason)
        .await?;
    Ok(Json(ApiResponse::success(
        "Document review recorded",
        UserView::from(updated),
    )))
}
