// src/config.rs

use std::env;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for the flat-file document store.
    pub data_dir: String,
    /// Endpoint of the text-generation backend (text-generation-inference style).
    pub generator_url: String,
    /// Client-side timeout for one narrative generation call.
    pub generator_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".to_string());

        let generator_url = env::var("GENERATOR_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/generate".to_string());

        let generator_timeout_secs = env::var("GENERATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            data_dir,
            generator_url,
            generator_timeout_secs,
            rust_log,
        }
    }
}
