//! LLM provider implementations

mod factory;
mod gemini;
mod http_client;
mod openai;

pub use factory::{LlmProviderConfig, LlmProviderFactory, ProviderKind};
pub(crate) use factory::require_api_key;
pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
