// routes/app_routes.rs

use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Extension, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app_state::AppState;
use crate::handlers::health_handlers::health_check;
use crate::handlers::message_handlers::{create_message, get_message, missing_message_id, record_view};

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/messages", post(create_message))
        .route("/api/messages/", get(missing_message_id))
        .route("/api/messages/:uuid", get(get_message))
        .route("/api/messages/:uuid/view", post(record_view))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
