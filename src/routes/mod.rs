// src/routes/mod.rs
pub mod chat;

use std::any::Any;

use crate::error::AppError;
use crate::services::audio::MEDIA_URL_PREFIX;
use crate::services::generation::panic_message;
use crate::state::SharedState;
use axum::{
    Json, Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::{call_handler, chat_handler, method_not_allowed};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState) -> Router {
    let media = ServeDir::new(state.pipeline.audio().media_dir());

    Router::new()
        .route("/", get(landing))
        .route("/health", get(|| async { "OK" }))
        .route("/chat", post(chat_handler))
        .route("/call", post(call_handler))
        // paths used by the existing web front end
        .route("/chat_with_healthbot/", post(chat_handler))
        .route("/api/chat/", post(chat_handler))
        .route("/ai_call/", post(call_handler))
        .method_not_allowed_fallback(method_not_allowed)
        .nest_service(MEDIA_URL_PREFIX, media)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn landing() -> Json<Value> {
    Json(json!({ "message": "HealthBot is running" }))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal(panic_message(&*err)).into_response()
}
