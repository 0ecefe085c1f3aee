use anyhow::{Context, Result};

/// Environment variables checked for the Groq key, in precedence order.
pub const GROQ_KEY_VARS: [&str; 2] = ["GROQ_API_KEY_AGENT_KA_SCORER", "GROQ_API_KEY"];

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// Region, bucket and agent identifiers are compile-time constants and do not
/// live here.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when neither key variable is set; scoring then short-circuits.
    pub groq_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: first_configured(&GROQ_KEY_VARS, |key| std::env::var(key).ok()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

/// Returns the first non-empty value among `keys`, looked up in order.
fn first_configured<F>(keys: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
