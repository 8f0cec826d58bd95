pub mod auth_service;
pub mod donation_service;
pub mod notification_service;
pub mod profile_service;
pub mod request_service;
pub mod staff_service;
