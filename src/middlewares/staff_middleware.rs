use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::middlewares::auth_middleware::AuthedUser;
use crate::util::error::{HandlerError, HandlerErrorKind};

fn forbidden(message: &str) -> HandlerError {
    HandlerError {
        error: HandlerErrorKind::Forbidden,
        message: message.to_string(),
        details: None,
    }
}

/// Staff guard, layered inside [`require_auth`]. The `staff` role flag alone
/// is not enough; the account must also carry `staff_approval`.
pub async fn require_staff(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let user = req
        .extensions()
        .get::<AuthedUser>()
        .ok_or_else(|| forbidden("Staff access required"))?;

    if !user.0.is_approved_staff() {
        warn!("User {} attempted a staff operation", user.0.user_id);
        return Err(forbidden("Staff access required"));
    }

    Ok(next.run(req).await)
}

/// Admin guard for operations like toggling staff approval.
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let user = req
        .extensions()
        .get::<AuthedUser>()
        .ok_or_else(|| forbidden("Admin access required"))?;

    if !user.0.roles.admin {
        warn!("User {} attempted an admin operation", user.0.user_id);
        return Err(forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}
