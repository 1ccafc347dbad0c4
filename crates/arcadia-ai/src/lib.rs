pub mod ollama;
pub mod provider;
pub mod stub;

pub use ollama::OllamaProvider;
pub use provider::{GenerationOptions, LlmError, LlmProvider, LlmResult};
pub use stub::StubProvider;
