pub mod donation;
pub mod request;
pub mod user;
