use crate::provider::{GenerationOptions, LlmError, LlmProvider, LlmResult};
use arcadia_core::LlmConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Provider for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaProvider {
    config: LlmConfig,
    client: Client,
}

impl OllamaProvider {
    pub fn new(config: LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(LlmConfig::default())
    }

    async fn try_request(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> LlmResult<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.config.base_url))
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(options.timeout)
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Transport(format!("HTTP {status}: {body}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        Ok(body.response)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if cancel.is_cancelled() {
                return Err(LlmError::Cancelled);
            }
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Err(LlmError::Cancelled),
                }
            }

            match self.try_request(prompt, options).await {
                Ok(response) => return Ok(response),
                // Rate limits and malformed bodies are not retried here.
                Err(e @ LlmError::RateLimited(_)) | Err(e @ LlmError::MalformedResponse(_)) => {
                    return Err(e);
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        tracing::warn!(
                            provider = self.provider_name(),
                            attempt = attempt + 1,
                            max = self.config.max_retries + 1,
                            error = %e,
                            "LLM request failed, retrying"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Transport("all retries failed".to_string())))
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API request/response types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_reports_configured_model() {
        let provider = OllamaProvider::new(LlmConfig {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3:instruct".to_string(),
            timeout_secs: 60,
            max_retries: 3,
        })
        .unwrap();
        assert_eq!(provider.model_name(), "llama3:instruct");
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let provider = OllamaProvider::from_env().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = provider
            .generate("test", &GenerationOptions::default(), &cancel)
            .await;
        assert!(matches!(result, Err(LlmError::Cancelled)));
    }
}
