pub mod donation_repo;
pub mod repository_error;
pub mod request_repo;
pub mod user_repo;
