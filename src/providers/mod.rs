pub mod base;
pub mod errors;
pub mod openai;

pub use base::{ChatRequest, CompletionProvider, Message, ProviderMetrics, RetryConfig};
pub use openai::OpenAIProvider;
