//! Chat endpoints

use crate::api::ApiError;
use crate::core::traits::{ChatService, TurnRequest};
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/clear_chat", post(clear_chat))
}

async fn chat(
    Inject(chat_service): Inject<dyn ChatService>,
    Json(request): Json<schemas::ChatRequest>,
) -> Result<Json<schemas::ChatResponse>, ApiError> {
    let session_id = request.session_id.clone();

    let reply = chat_service
        .complete_turn(TurnRequest {
            session_id: request.session_id,
            message: request.message,
            mode: request.mode,
            give_answer_requested: request.give_answer_requested,
        })
        .await?;

    Ok(Json(schemas::ChatResponse {
        response: reply.response,
        mode: reply.mode.as_str().to_owned(),
        session_id,
    }))
}

async fn clear_chat(
    Inject(chat_service): Inject<dyn ChatService>,
    Json(request): Json<schemas::ClearChatRequest>,
) -> Result<Json<schemas::ClearChatResponse>, ApiError> {
    chat_service.clear_session(&request.session_id).await?;

    Ok(Json(schemas::ClearChatResponse {
        message: format!("Chat history cleared for session {}", request.session_id),
    }))
}

pub mod schemas {
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug)]
    pub struct ChatRequest {
        pub session_id: String,
        pub message: String,
        pub mode: String,
        #[serde(default)]
        pub give_answer_requested: bool,
    }

    #[derive(Serialize, Debug)]
    pub struct ChatResponse {
        pub response: String,
        pub mode: String,
        pub session_id: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct ClearChatRequest {
        pub session_id: String,
    }

    #[derive(Serialize, Debug)]
    pub struct ClearChatResponse {
        pub message: String,
    }
}
