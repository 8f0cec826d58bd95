use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::donation_handler::{
    create_donation_handler, delete_donation_handler, get_donation_handler,
    list_all_donations_handler, list_my_donations_handler, update_donation_handler,
    update_donation_status_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::middlewares::staff_middleware::require_staff;
use crate::service::donation_service::DonationServiceImpl;

pub fn donation_router(service: Arc<DonationServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // DELETE lives beside the owner-facing GET; the handler enforces staff.
    let own = Router::new()
        .route(
            "/api/donations",
            post(create_donation_handler).get(list_my_donations_handler),
        )
        .route(
            "/api/donations/{donation_id}",
            get(get_donation_handler)
                .put(update_donation_handler)
                .delete(delete_donation_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    let staff = Router::new()
        .route("/api/donations/all", get(list_all_donations_handler))
        .route(
            "/api/donations/{donation_id}/status",
            patch(update_donation_status_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    own.merge(staff).with_state(service)
}
