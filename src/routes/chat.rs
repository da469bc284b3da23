use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::prompt::EndpointKind,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;
    let body = state.pipeline.run(EndpointKind::Chat, payload.text()).await?;
    Ok(Json(body))
}

pub async fn call_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;
    let body = state.pipeline.run(EndpointKind::VoiceCall, payload.text()).await?;
    Ok(Json(body))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
