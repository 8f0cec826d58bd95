use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::request_handler::{
    create_request_handler, delete_request_handler, fulfill_request_handler,
    get_request_handler, list_all_requests_handler, list_my_requests_handler,
    update_request_handler, update_request_status_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::middlewares::staff_middleware::require_staff;
use crate::service::request_service::RequestServiceImpl;

pub fn request_router(service: Arc<RequestServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let own = Router::new()
        .route(
            "/api/requests",
            post(create_request_handler).get(list_my_requests_handler),
        )
        .route(
            "/api/requests/{request_id}",
            get(get_request_handler)
                .put(update_request_handler)
                .delete(delete_request_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    let staff = Router::new()
        .route("/api/requests/all", get(list_all_requests_handler))
        .route(
            "/api/requests/{request_id}/status",
            patch(update_request_status_handler),
        )
        .route(
            "/api/requests/{request_id}/fulfill",
            post(fulfill_request_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    own.merge(staff).with_state(service)
}
