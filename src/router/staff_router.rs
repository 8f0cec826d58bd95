use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::staff_handler::{
    dashboard_handler, list_users_handler, send_notification_handler, set_staff_approval_handler,
    StaffHandlerState,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::middlewares::staff_middleware::{require_admin, require_staff};

pub fn staff_router(state: StaffHandlerState, auth_state: Arc<AuthState>) -> Router {
    let staff = Router::new()
        .route("/api/staff/dashboard", get(dashboard_handler))
        .route("/api/staff/users", get(list_users_handler))
        .route(
            "/api/staff/users/{user_id}/notifications",
            post(send_notification_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    // Approval toggling is reserved for admins.
    let admin = Router::new()
        .route(
            "/api/staff/users/{user_id}/approval",
            patch(set_staff_approval_handler),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    staff.merge(admin).with_state(state)
}
