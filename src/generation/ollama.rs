use super::{GenerationClient, GenerationError, http_client, transport_error};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for a local Ollama runtime's `/api/generate` endpoint.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Build a client targeting `base_url` (normally `http://127.0.0.1:11434`).
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            http: http_client("docdigest/ollama", timeout)?,
            base_url,
            model,
            timeout_secs: timeout.as_secs(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                transport_error(error, "Ollama", &self.base_url, self.timeout_secs)
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(GenerationError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn client(server: &MockServer) -> OllamaClient {
        OllamaClient::new(server.base_url(), "llama3.2".into(), Duration::from_secs(5))
            .expect("client")
    }

    #[tokio::test]
    async fn returns_trimmed_completion() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({
                        "model": "llama3.2",
                        "prompt": "Translate",
                        "stream": false
                    }));
                then.status(200).json_body(json!({
                    "response": "  Hello \n",
                    "done": true
                }));
            })
            .await;

        let text = client(&server).generate("Translate").await.expect("completion");

        mock.assert_async().await;
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn error_status_is_a_generation_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = client(&server).generate("prompt").await.expect_err("error");
        assert!(
            matches!(&error, GenerationError::GenerationFailed(message) if message.contains("500")),
            "{error}"
        );
    }

    #[tokio::test]
    async fn incomplete_response_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({ "response": "partial", "done": false }));
            })
            .await;

        let error = client(&server).generate("prompt").await.expect_err("partial");
        assert!(matches!(error, GenerationError::InvalidResponse(_)));
    }
}
