mod chat;
mod config;
mod errors;
mod llm_client;
mod multipart;
mod routes;
mod scoring;
mod state;
mod storage;
mod upload;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::{BedrockAgent, AGENT_ALIAS_ID, AGENT_ID};
use crate::config::{Config, GROQ_KEY_VARS};
use crate::llm_client::LlmClient;
use crate::routes::{build_router, cors_layer};
use crate::scoring::scorer::LlmResumeScorer;
use crate::state::AppState;
use crate::storage::{S3BlobStore, BUCKET_NAME, REGION};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KAI API v{}", env!("CARGO_PKG_VERSION"));

    let aws = load_aws_config().await;

    let store = S3BlobStore::new(aws_sdk_s3::Client::new(&aws), BUCKET_NAME);
    info!("S3 client initialized (bucket: {BUCKET_NAME}, region: {REGION})");

    let agent = BedrockAgent::new(
        aws_sdk_bedrockagentruntime::Client::new(&aws),
        AGENT_ID,
        AGENT_ALIAS_ID,
    );
    info!("Bedrock agent client initialized (agent: {AGENT_ID}, alias: {AGENT_ALIAS_ID})");

    let llm = match &config.groq_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(LlmClient::new(key.clone())?)
        }
        None => {
            warn!(
                "{} (or {}) not set; resume scoring will return zero scores",
                GROQ_KEY_VARS[0], GROQ_KEY_VARS[1]
            );
            None
        }
    };

    let state = AppState {
        agent: Arc::new(agent),
        store: Arc::new(store),
        scorer: Arc::new(LlmResumeScorer::new(llm)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared AWS configuration for S3 and Bedrock; credentials come from the default provider chain.
async fn load_aws_config() -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(REGION))
        .load()
        .await
}
