use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Failure modes of the gateway. Transport and timeout failures are retried
/// inside the provider; rate limits and malformed responses propagate.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl LlmError {
    /// Transport-class failures are absorbed by callers as empty
    /// sub-extractions; the rest propagate unchanged.
    pub fn is_transport_class(&self) -> bool {
        matches!(
            self,
            LlmError::Transport(_) | LlmError::Timeout(_) | LlmError::Cancelled
        )
    }
}

/// Generation parameters for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature, in [0, 1].
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<usize>,
    /// Upper bound for the request.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: Some(2000),
            timeout: Duration::from_secs(60),
        }
    }
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Uniform text-in / text-out boundary to the remote generation endpoint.
///
/// The provider is the only component that knows the endpoint's wire format.
/// Implementations must tolerate concurrent requests and apply their retry
/// policy per request.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a prompt. Cancellation is honoured at the next
    /// retry boundary.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        cancel: &CancellationToken,
    ) -> LlmResult<String>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}
