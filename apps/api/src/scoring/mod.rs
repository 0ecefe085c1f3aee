// Resume scoring: text extraction, prompt construction, LLM scoring, and the /score handler.
// All LLM calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod scorer;
