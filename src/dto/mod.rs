pub mod auth_dto;
pub mod donation_dto;
pub mod profile_dto;
pub mod request_dto;
pub mod staff_dto;

use serde::Serialize;

/// Standard success envelope: `{status, message, data?}`.
/// Error envelopes (`fail`/`error`) are produced by `HandlerError`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}
