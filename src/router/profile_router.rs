use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::handler::profile_handler::{
    get_profile_handler, review_document_handler, review_kyc_handler, update_profile_handler,
    upload_kyc_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::middlewares::staff_middleware::require_staff;
use crate::service::profile_service::ProfileServiceImpl;

pub fn profile_router(service: Arc<ProfileServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Routes any authenticated user may call on their own profile.
    let own = Router::new()
        .route("/api/profile", get(get_profile_handler))
        .route("/api/profile/update", put(update_profile_handler))
        .route("/api/profile/upload-kyc", post(upload_kyc_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    // KYC review requires an approved staff account.
    let staff = Router::new()
        .route("/api/profile/kyc/{user_id}", patch(review_kyc_handler))
        .route(
            "/api/profile/kyc/{user_id}/documents/{document_id}",
            patch(review_document_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    own.merge(staff).with_state(service)
}
