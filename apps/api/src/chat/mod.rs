//! Conversational agent access.
//!
//! `AppState` carries an `Arc<dyn AgentInvoker>`; production uses `BedrockAgent`.
//! The provider's event stream is normalised into [`AgentEvent`]s so that
//! draining logic in [`stream`] does not depend on SDK types.

pub mod handlers;
pub mod stream;

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::{OrchestrationTrace, ResponseStream, Trace, TracePart};
use futures::stream::BoxStream;
use tracing::debug;

use crate::errors::AppError;

pub const AGENT_ID: &str = "S8RNS7VDRF";
pub const AGENT_ALIAS_ID: &str = "68QKMHX3JK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A fragment of the reply payload.
    Chunk(Vec<u8>),
    /// The agent signalled its final response. Only terminal once a chunk has been read.
    FinalResponse,
    /// Anything else (traces, file parts, return-control payloads).
    Other,
}

pub type AgentEventStream = BoxStream<'static, Result<AgentEvent, AppError>>;

#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, session_id: &str, input_text: &str) -> Result<AgentEventStream, AppError>;
}

#[derive(Clone)]
pub struct BedrockAgent {
    client: aws_sdk_bedrockagentruntime::Client,
    agent_id: String,
    agent_alias_id: String,
}

impl BedrockAgent {
    pub fn new(
        client: aws_sdk_bedrockagentruntime::Client,
        agent_id: impl Into<String>,
        agent_alias_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            agent_alias_id: agent_alias_id.into(),
        }
    }
}

#[async_trait]
impl AgentInvoker for BedrockAgent {
    async fn invoke(&self, session_id: &str, input_text: &str) -> Result<AgentEventStream, AppError> {
        let output = self
            .client
            .invoke_agent()
            .agent_id(&self.agent_id)
            .agent_alias_id(&self.agent_alias_id)
            .session_id(session_id)
            .input_text(input_text)
            .send()
            .await
            .map_err(|e| AppError::Agent(format!("{}", DisplayErrorContext(&e))))?;

        let mut completion = output.completion;
        let events = async_stream::stream! {
            loop {
                match completion.recv().await {
                    Ok(Some(event)) => yield Ok(map_event(event)),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(AppError::Agent(format!("{}", DisplayErrorContext(&e))));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(events))
    }
}

fn map_event(event: ResponseStream) -> AgentEvent {
    match event {
        ResponseStream::Chunk(part) => {
            AgentEvent::Chunk(part.bytes.map(|b| b.into_inner()).unwrap_or_default())
        }
        ResponseStream::Trace(part) if is_final_response(&part) => AgentEvent::FinalResponse,
        other => {
            debug!("Ignoring agent event: {other:?}");
            AgentEvent::Other
        }
    }
}

fn is_final_response(part: &TracePart) -> bool {
    matches!(
        part.trace(),
        Some(Trace::OrchestrationTrace(OrchestrationTrace::Observation(observation)))
            if observation.final_response().is_some()
    )
}
