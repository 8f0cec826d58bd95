use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::{debug, warn};

use crate::model::user::User;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

/// The live user document for the authenticated caller, inserted into
/// request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthedUser(pub User);

fn unauthorized(message: &str) -> HandlerError {
    HandlerError {
        error: HandlerErrorKind::Unauthorized,
        message: message.to_string(),
        details: None,
    }
}

/// Bearer-token guard. Validates the access token, re-loads the user, and
/// rejects tokens whose `jwt_version` no longer matches the live document.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| unauthorized("Invalid authorization header"))?;

    let claims = state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    let user = state
        .user_repo
        .find_by_user_id(&claims.sub)
        .await
        .map_err(|e| {
            warn!("Auth user lookup failed: {}", e);
            HandlerError::internal("Internal server error")
        })?
        .ok_or_else(|| unauthorized("User no longer exists"))?;

    if user.jwt_version != claims.jwt_version {
        warn!("Stale token presented for user {}", user.user_id);
        return Err(unauthorized("Token has been invalidated"));
    }

    debug!("Authenticated user {}", user.user_id);
    req.extensions_mut().insert(AuthedUser(user));
    Ok(next.run(req).await)
}
