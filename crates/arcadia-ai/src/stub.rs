use crate::provider::{GenerationOptions, LlmError, LlmProvider, LlmResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

/// Deterministic provider for tests: replays a queue of scripted responses
/// and records the prompts it was asked.
///
/// When the queue is exhausted the fallback response is returned, so a stub
/// with no script behaves like a model that always answers the same thing.
pub struct StubProvider {
    responses: Mutex<VecDeque<LlmResult<String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: String::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A stub that answers every prompt with the same text.
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue the next scripted response.
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().push_back(Ok(response.into()));
    }

    /// Queue a scripted failure.
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Prompts seen so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }
        self.prompts.lock().push(prompt.to_string());
        match self.responses.lock().pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.fallback.clone()),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_scripted_responses_in_order() {
        let stub = StubProvider::with_fallback("fallback");
        stub.push_response("first");
        stub.push_response("second");

        let cancel = CancellationToken::new();
        let options = GenerationOptions::default();
        assert_eq!(stub.generate("a", &options, &cancel).await.unwrap(), "first");
        assert_eq!(stub.generate("b", &options, &cancel).await.unwrap(), "second");
        assert_eq!(
            stub.generate("c", &options, &cancel).await.unwrap(),
            "fallback"
        );
        assert_eq!(stub.recorded_prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn scripted_errors_propagate() {
        let stub = StubProvider::new();
        stub.push_error(LlmError::Transport("down".to_string()));
        let cancel = CancellationToken::new();
        let result = stub
            .generate("x", &GenerationOptions::default(), &cancel)
            .await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }
}
