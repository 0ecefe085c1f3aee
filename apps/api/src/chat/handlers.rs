//! Axum route handler for agent chat.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::stream::collect_reply;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Accepts a [`ChatRequest`] as url-encoded form data or, by default, JSON.
pub struct ChatInput(pub ChatRequest);

#[async_trait]
impl<S> FromRequest<S> for ChatInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(request) = Form::<ChatRequest>::from_request(req, state).await?;
            Ok(ChatInput(request))
        } else {
            let Json(request) = Json::<ChatRequest>::from_request(req, state).await?;
            Ok(ChatInput(request))
        }
    }
}

/// POST /chat
///
/// Opens a fresh agent session for every call; no conversation state is kept here.
pub async fn handle_chat(
    State(state): State<AppState>,
    ChatInput(request): ChatInput,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id = Uuid::new_v4().to_string();
    info!(
        "Invoking agent, session {session_id}, message length {}",
        request.message.len()
    );

    let events = state.agent.invoke(&session_id, &request.message).await?;
    let reply = collect_reply(events).await?;

    info!("Agent session {session_id} replied with {} chars", reply.chars().count());
    Ok(Json(ChatResponse { reply }))
}
