/// LLM Client: the single point of entry for all text-generation calls in mockprep.
///
/// ARCHITECTURAL RULE: No other module may call the generation service directly.
/// Question generation and answer scoring both go through `LlmClient::generate`,
/// so sampling and safety settings apply to both uniformly.
///
/// Model: gemini-2.0-flash-exp (hardcoded, not configurable)
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod gemini;
pub mod prompts;
pub mod response;

use crate::llm_client::gemini::GeminiService;
use crate::llm_client::response::{preview, sanitize_and_parse};

/// The model used for all generation calls.
pub const MODEL: &str = "gemini-2.0-flash-exp";

/// Bound on one `generate` call, retries included, unless overridden.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Response blocked by safety filters: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No JSON array found in response")]
    NoJsonArray,

    #[error("Invalid JSON format: {0}")]
    Parse(String),

    #[error("Unexpected record shape: {0}")]
    UnexpectedShape(String),
}

impl LlmError {
    /// Stable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LlmError::NoJsonArray => "EXTRACTION_ERROR",
            LlmError::Parse(_) | LlmError::UnexpectedShape(_) => "PARSE_ERROR",
            LlmError::Http(_)
            | LlmError::Api { .. }
            | LlmError::RateLimited { .. }
            | LlmError::Timeout(_)
            | LlmError::Blocked(_)
            | LlmError::EmptyContent => "GENERATION_SERVICE_ERROR",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

/// Everything sent alongside a prompt. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub generation: GenerationConfig,
    pub safety: Vec<SafetySetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                temperature: 1.0,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                response_mime_type: "text/plain".to_string(),
            },
            // Harassment and hate block at low; sexual and dangerous content at medium.
            safety: vec![
                SafetySetting {
                    category: HarmCategory::HarmCategoryHarassment,
                    threshold: HarmBlockThreshold::BlockLowAndAbove,
                },
                SafetySetting {
                    category: HarmCategory::HarmCategoryHateSpeech,
                    threshold: HarmBlockThreshold::BlockLowAndAbove,
                },
                SafetySetting {
                    category: HarmCategory::HarmCategorySexuallyExplicit,
                    threshold: HarmBlockThreshold::BlockMediumAndAbove,
                },
                SafetySetting {
                    category: HarmCategory::HarmCategoryDangerousContent,
                    threshold: HarmBlockThreshold::BlockMediumAndAbove,
                },
            ],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service seam
// ────────────────────────────────────────────────────────────────────────────

/// The external text-completion collaborator. Returns free-form text, never trusted.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, settings: &GenerationSettings)
        -> Result<String, LlmError>;
}

/// The single generation client used by all services in mockprep.
#[derive(Clone)]
pub struct LlmClient {
    service: Arc<dyn CompletionService>,
    settings: GenerationSettings,
    timeout: Duration,
}

impl LlmClient {
    /// Client backed by the Gemini API. `timeout` bounds each `generate` call as a whole.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        let service = GeminiService::new(api_key, timeout)?;
        Ok(Self::with_service(Arc::new(service)).with_timeout(timeout))
    }

    pub fn with_service(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            settings: GenerationSettings::default(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `prompt`, then sanitizes and decodes the reply into a JSON array of records.
    /// The first failure is returned unmodified; there is no fallback to an empty result.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<Value>, LlmError> {
        debug!("Generation call: prompt_chars={}", prompt.len());

        let raw = tokio::time::timeout(self.timeout, self.service.complete(prompt, &self.settings))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        debug!("Generation call returned {} chars", raw.len());

        sanitize_and_parse(&raw).inspect_err(|e| {
            warn!(
                "Could not structure model output ({e}); raw preview: {:?}",
                preview(&raw, 200)
            );
        })
    }
}
