pub mod error;
pub mod request;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};

use plinko_core::AppState;

/// Assemble the public router. The caller supplies state and outer layers
/// (tracing, body limits).
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/interactions", post(routes::interactions::handle_interaction))
        .route("/polls/{id}", get(routes::polls::get_poll))
        .route("/polls/{id}/close", post(routes::polls::close_poll))
}
