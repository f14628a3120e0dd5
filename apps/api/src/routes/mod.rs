pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::introductions::handlers as introductions;
use crate::professionals::handlers as profiles;
use crate::professionals::search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Introduction lifecycle
        .route(
            "/api/v1/introductions/request",
            post(introductions::handle_create),
        )
        .route(
            "/api/v1/introductions/received",
            get(introductions::handle_received),
        )
        .route(
            "/api/v1/introductions/sent",
            get(introductions::handle_sent),
        )
        .route(
            "/api/v1/introductions/:id/accept",
            post(introductions::handle_accept),
        )
        .route(
            "/api/v1/introductions/:id/decline",
            post(introductions::handle_decline),
        )
        .route(
            "/api/v1/introductions/:id/view",
            post(introductions::handle_mark_viewed),
        )
        // Professional profiles
        .route(
            "/api/v1/professionals/me",
            get(profiles::handle_get_me).put(profiles::handle_update_me),
        )
        .route(
            "/api/v1/professionals/search",
            get(search::handle_search),
        )
        .with_state(state)
}
