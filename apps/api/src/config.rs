use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::scoring::policy::AnswerPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub knowledge_base_path: PathBuf,
    pub answer_policy: AnswerPolicy,
    pub recommendation_limit: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let recommendation_limit = env_or("RECOMMENDATION_LIMIT", "5")
            .parse::<usize>()
            .context("RECOMMENDATION_LIMIT must be a positive integer")?;
        ensure!(
            recommendation_limit > 0,
            "RECOMMENDATION_LIMIT must be at least 1"
        );

        Ok(Config {
            knowledge_base_path: PathBuf::from(env_or("KNOWLEDGE_BASE_PATH", "knowledge_base.json")),
            answer_policy: env_or("ANSWER_POLICY", "graded")
                .parse::<AnswerPolicy>()
                .context("ANSWER_POLICY must be 'graded', 'any' or 'positive:<indices>'")?,
            recommendation_limit,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
