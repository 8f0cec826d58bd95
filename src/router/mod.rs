pub mod auth_router;
pub mod donation_router;
pub mod notification_router;
pub mod profile_router;
pub mod request_router;
pub mod staff_router;
