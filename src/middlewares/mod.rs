pub mod auth_middleware;
pub mod staff_middleware;
