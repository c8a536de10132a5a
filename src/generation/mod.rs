//! Adapters for the remote text-generation service.
//!
//! The pipeline only sees [`GenerationClient`]: one prompt in, one trimmed completion out. Each
//! call issues exactly one HTTP request with a bounded timeout and no retries.

mod gemini;
mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use crate::config::{GenerationProvider, GenerationSettings};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while requesting a completion.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider could not be reached or the client could not be constructed.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider did not answer within the configured timeout.
    #[error("Generation request timed out after {0} seconds")]
    Timeout(u64),
    /// Provider returned a non-success status (quota, auth, server error).
    #[error("Failed to generate text: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send `prompt` to the provider and return its trimmed completion.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Build the generation client selected by configuration.
pub fn build_generation_client(
    settings: &GenerationSettings,
) -> Result<Arc<dyn GenerationClient>, GenerationError> {
    tracing::info!(
        provider = ?settings.provider,
        model = %settings.model,
        timeout_secs = settings.timeout.as_secs(),
        "Initializing generation client"
    );
    let client: Arc<dyn GenerationClient> = match settings.provider {
        GenerationProvider::Gemini => {
            let api_key = settings.api_key.clone().ok_or_else(|| {
                GenerationError::ProviderUnavailable("Gemini API key is not configured".into())
            })?;
            Arc::new(GeminiClient::new(
                settings.base_url.clone(),
                settings.model.clone(),
                api_key,
                settings.timeout,
            )?)
        }
        GenerationProvider::Ollama => Arc::new(OllamaClient::new(
            settings.base_url.clone(),
            settings.model.clone(),
            settings.timeout,
        )?),
    };
    Ok(client)
}

/// Map a transport error from reqwest into the generation taxonomy.
pub(crate) fn transport_error(
    error: reqwest::Error,
    provider: &str,
    base_url: &str,
    timeout_secs: u64,
) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout(timeout_secs)
    } else {
        GenerationError::ProviderUnavailable(format!(
            "failed to reach {provider} at {base_url}: {error}"
        ))
    }
}

pub(crate) fn http_client(
    user_agent: &str,
    timeout: std::time::Duration,
) -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|error| {
            GenerationError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(provider: GenerationProvider, api_key: Option<&str>) -> GenerationSettings {
        GenerationSettings {
            provider,
            model: "test-model".into(),
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn gemini_requires_an_api_key() {
        let error = build_generation_client(&settings(GenerationProvider::Gemini, None))
            .err()
            .expect("missing key");
        assert!(matches!(error, GenerationError::ProviderUnavailable(_)));
    }

    #[test]
    fn builds_each_provider() {
        assert!(build_generation_client(&settings(GenerationProvider::Gemini, Some("k"))).is_ok());
        assert!(build_generation_client(&settings(GenerationProvider::Ollama, None)).is_ok());
    }
}
