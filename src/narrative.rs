// src/narrative.rs

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::insights::{TASK_END, TASK_START};

// Generation length and sampling knobs sent to the backend.
// Tuning values, not part of the contract.
const MAX_NEW_TOKENS: u32 = 250;
const MIN_LENGTH: u32 = 80;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const REPETITION_PENALTY: f32 = 1.2;

/// Errors from the text-generation backend.
#[derive(Debug)]
pub enum GeneratorError {
    Http(reqwest::Error),
    Backend(String),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Http(e) => write!(f, "generation request failed: {}", e),
            GeneratorError::Backend(msg) => write!(f, "generation backend error: {}", msg),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Http(e) => Some(e),
            GeneratorError::Backend(_) => None,
        }
    }
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        GeneratorError::Http(err)
    }
}

/// Free-form text generation conditioned on a prompt, bounded length.
///
/// Output may be sampled; tests inject deterministic stubs so nothing
/// downstream depends on what a real model produces.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: u32,
    min_length: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

/// Client for a text-generation-inference style HTTP backend.
pub struct HttpTextGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTextGenerator {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let request = GenerateRequest {
            inputs: prompt,
            parameters: Parameters {
                max_new_tokens: MAX_NEW_TOKENS,
                min_length: MIN_LENGTH,
                temperature: TEMPERATURE,
                top_p: TOP_P,
                repetition_penalty: REPETITION_PENALTY,
                do_sample: true,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let mut body: Vec<Generated> = response.json().await?;
        if body.is_empty() {
            return Err(GeneratorError::Backend(
                "empty generation response".to_string(),
            ));
        }
        Ok(body.remove(0).generated_text)
    }
}

/// Generates the narrative for `prompt` and cleans up the raw output.
///
/// Failures never escape: any backend error becomes a placeholder string,
/// so the surrounding insights request still returns its analytics.
pub async fn synthesize(generator: &dyn TextGenerator, prompt: &str) -> String {
    match generator.generate(prompt).await {
        Ok(raw) => postprocess(&raw),
        Err(e) => {
            tracing::warn!("Narrative generation failed: {}", e);
            format!("⚠️ AI model error: {}", e)
        }
    }
}

static ECHOED_TASK: OnceLock<Regex> = OnceLock::new();
static SALUTATION: OnceLock<Regex> = OnceLock::new();

/// Cleans raw generator output.
///
/// Strips any echoed instruction block (and stray markers), cuts at the
/// first closing salutation dropping everything after it, de-duplicates
/// repeated sentences keeping the first occurrence, trims whitespace.
fn postprocess(raw: &str) -> String {
    let echoed = ECHOED_TASK.get_or_init(|| {
        Regex::new(&format!(
            "(?s){}.*?{}",
            regex::escape(TASK_START),
            regex::escape(TASK_END)
        ))
        .expect("static pattern")
    });
    let mut text = echoed.replace_all(raw, "").into_owned();
    // Some backends echo a lone marker without its pair.
    text = text.replace(TASK_START, "").replace(TASK_END, "");

    let salutation = SALUTATION.get_or_init(|| {
        Regex::new(r"(?i)(sincerely|best regards|best\s*,|thank you)").expect("static pattern")
    });
    if let Some(cut) = salutation.find(&text).map(|m| m.start()) {
        text.truncate(cut);
    }

    // Sampling still repeats itself; keep the first occurrence of each sentence.
    let mut seen: Vec<&str> = Vec::new();
    for sentence in text.split(". ") {
        if !seen.contains(&sentence) {
            seen.push(sentence);
        }
    }
    let deduped = seen.join(". ");

    deduped.trim().to_string()
}
