//! Router assembly. Entity routes use parameterized paths; handlers resolve
//! the entity from the segment. Static paths take priority over the
//! parameterized ones, so `/tables` and the nested booking route never fall
//! through to the generic handlers.

use crate::handlers::{entity, meta};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(meta::root))
        .route("/health", get(meta::health))
        .route("/version", get(meta::version))
        .route("/openapi.json", get(meta::openapi))
        .route("/tables", get(meta::tables))
        .route("/services/:service_id/bookings", post(entity::create_booking))
        .route("/:segment", get(entity::list).post(entity::create))
        .route(
            "/:segment/:id",
            get(entity::read).put(entity::update).delete(entity::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
