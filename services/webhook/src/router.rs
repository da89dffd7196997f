//! Axum Router Configuration
//!
//! The fulfillment platform delivers every webhook call as a POST to a
//! single endpoint; routing to the right handler happens by handler name
//! inside the dispatcher.

use crate::{handlers, state::AppState};
use axum::{Router, routing::post};
use std::sync::Arc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::fulfillment))
        .with_state(app_state)
}
