pub mod auth_handler;
pub mod donation_handler;
pub mod notification_handler;
pub mod profile_handler;
pub mod request_handler;
pub mod staff_handler;
