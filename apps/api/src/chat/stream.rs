use futures::StreamExt;

use crate::chat::{AgentEvent, AgentEventStream};
use crate::errors::AppError;

/// Drains an agent event stream into the reply text.
///
/// Reading stops at end of stream, or at an [`AgentEvent::FinalResponse`] that
/// follows at least one chunk. A final-response trace arriving before any chunk
/// is skipped, since the answer text is still to come. Chunk bytes are decoded
/// once at the end so a character split across chunks survives.
pub async fn collect_reply(mut events: AgentEventStream) -> Result<String, AppError> {
    let mut reply = Vec::new();
    let mut seen_chunk = false;

    while let Some(event) = events.next().await {
        match event? {
            AgentEvent::Chunk(bytes) => {
                seen_chunk = true;
                reply.extend_from_slice(&bytes);
            }
            AgentEvent::FinalResponse if seen_chunk => break,
            AgentEvent::FinalResponse | AgentEvent::Other => {}
        }
    }

    String::from_utf8(reply)
        .map_err(|e| AppError::Agent(format!("Agent reply is not valid UTF-8: {e}")))
}
