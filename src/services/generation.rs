use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned to the user whenever the model gives us nothing usable.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response held no text")]
    EmptyCompletion,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("backend panicked: {0}")]
    Panicked(String),
}

/// A text-generation backend: one prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentOut>,
}

#[derive(Deserialize)]
struct GeminiContentOut {
    #[serde(default)]
    parts: Vec<GeminiPartOut>,
}

#[derive(Deserialize)]
struct GeminiPartOut {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: GEMINI_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = resp.json().await?;
        parsed.into_text().ok_or(GenerationError::EmptyCompletion)
    }
}

/// Wraps a `TextGenerator` so that failures never reach the caller.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Reply text for `prompt`, or [`FALLBACK_REPLY`] on any failure.
    pub async fn generate(&self, prompt: &str) -> String {
        let call = AssertUnwindSafe(self.backend.complete(prompt)).catch_unwind();
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(GenerationError::Panicked(panic_message(&*panic))),
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("generation returned blank text, using fallback");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, ()>);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(GenerationError::EmptyCompletion),
            }
        }
    }

    struct Slow;

    #[async_trait]
    impl TextGenerator for Slow {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn client(backend: impl TextGenerator + 'static, timeout: Duration) -> GenerationClient {
        GenerationClient::new(Arc::new(backend), timeout)
    }

    #[tokio::test]
    async fn passes_text_through() {
        let c = client(Fixed(Ok("Drink water.")), Duration::from_secs(1));
        assert_eq!(c.generate("p").await, "Drink water.");
    }

    #[tokio::test]
    async fn errors_and_blank_text_fall_back() {
        let c = client(Fixed(Err(())), Duration::from_secs(1));
        assert_eq!(c.generate("p").await, FALLBACK_REPLY);

        let c = client(Fixed(Ok("  \n")), Duration::from_secs(1));
        assert_eq!(c.generate("p").await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let c = client(Slow, Duration::from_millis(50));
        assert_eq!(c.generate("p").await, FALLBACK_REPLY);
    }

    #[test]
    fn response_text_extraction() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Eat "},{"text":"greens."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Eat greens."));

        let blocked: GeminiResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(blocked.into_text().is_none());

        let no_content: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(no_content.into_text().is_none());
    }

    #[test]
    fn endpoint_url() {
        let c = GeminiClient::new(reqwest::Client::new(), "gemini-2.0-flash", "k")
            .with_base_url("http://localhost:9/v1beta/");
        assert_eq!(
            c.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    struct Panicky;

    #[async_trait]
    impl TextGenerator for Panicky {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            panic!("client state corrupted");
        }
    }

    #[tokio::test]
    async fn panic_falls_back() {
        let c = client(Panicky, Duration::from_secs(1));
        assert_eq!(c.generate("p").await, FALLBACK_REPLY);
    }

    fn gemini_against(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(reqwest::Client::new(), "test-model", "secret-key")
            .with_base_url(format!("{}/v1beta", server.url()))
    }

    const GEMINI_PATH: &str = "/v1beta/models/test-model:generateContent";

    #[tokio::test]
    async fn gemini_sends_prompt_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GEMINI_PATH)
            .match_header("x-goog-api-key", "secret-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "How much water per day?"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"About two litres."}]}}]}"#)
            .create_async()
            .await;

        let gemini = gemini_against(&server);
        let text = gemini.complete("How much water per day?").await.unwrap();
        assert_eq!(text, "About two litres.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GEMINI_PATH)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let gemini = gemini_against(&server);
        let err = gemini.complete("hi").await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let c = GenerationClient::new(Arc::new(gemini), Duration::from_secs(5));
        assert_eq!(c.generate("hi").await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn gemini_malformed_and_empty_bodies() {
        let mut server = mockito::Server::new_async().await;
        let _garbage = server
            .mock("POST", GEMINI_PATH)
            .match_body(mockito::Matcher::Regex("garbage".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>not json</html>")
            .create_async()
            .await;
        let _empty = server
            .mock("POST", GEMINI_PATH)
            .match_body(mockito::Matcher::Regex("empty".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let gemini = gemini_against(&server);
        assert!(matches!(
            gemini.complete("garbage").await.unwrap_err(),
            GenerationError::Transport(_)
        ));
        assert!(matches!(
            gemini.complete("empty").await.unwrap_err(),
            GenerationError::EmptyCompletion
        ));

        let c = GenerationClient::new(Arc::new(gemini), Duration::from_secs(5));
        assert_eq!(c.generate("garbage").await, FALLBACK_REPLY);
        assert_eq!(c.generate("empty").await, FALLBACK_REPLY);
    }
}
