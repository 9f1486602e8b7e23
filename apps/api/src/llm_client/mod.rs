/// LLM Client — the single point of entry for prose-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// The report pipeline computes all rankings and hints before calling
/// `generate` exactly once per request; a failure is reported to the caller,
/// never retried by the pipeline itself.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Tried in order after the configured preferred model, duplicates removed.
const FALLBACK_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-4o"];
const TEMPERATURE: f32 = 0.7;

/// Returned instead of an error when no API key is configured, so local
/// development works without credentials.
pub const PLACEHOLDER_SUMMARY: &str =
    "# Summary\n\n1) Placeholder summary while developing without an API key.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,

    #[error("all models in the chain failed")]
    AllModelsFailed,
}

/// The prose-generation seam. Carried in `AppState` as
/// `Arc<dyn ProseGenerator>` so tests and dev tooling can swap the backend
/// without touching the handler or the pipeline.
#[async_trait]
pub trait ProseGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client with a model fallback chain: each model is tried
/// once in order and the first non-empty response wins.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model_chain: Vec<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, preferred_model: Option<String>) -> Self {
        let mut model_chain: Vec<String> = Vec::new();
        for model in preferred_model
            .into_iter()
            .chain(FALLBACK_MODELS.iter().map(|m| m.to_string()))
        {
            if !model_chain.contains(&model) {
                model_chain.push(model);
            }
        }
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model_chain,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.model_chain
    }

    async fn call_model(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: supports_temperature(model).then_some(TEMPERATURE),
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Some model families reject an explicit temperature parameter.
fn supports_temperature(model: &str) -> bool {
    !(model == "gpt-5" || model.starts_with("gpt-5-") || model.starts_with("gpt-5_"))
}

#[async_trait]
impl ProseGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OPENAI_API_KEY missing — returning placeholder summary");
            return Ok(PLACEHOLDER_SUMMARY.to_string());
        };

        let mut last_error = LlmError::AllModelsFailed;
        for model in &self.model_chain {
            match self.call_model(model, api_key, prompt).await {
                Ok(text) => {
                    debug!("prose generated by {model}");
                    return Ok(text);
                }
                Err(err) => {
                    warn!("model {model} failed: {err}");
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_chain_deduplicates_preferred() {
        let client = OpenAiClient::new(None, Some("gpt-4o-mini".to_string()));
        assert_eq!(client.models(), &["gpt-4o-mini", "gpt-4o"]);
    }

    #[test]
    fn test_model_chain_prepends_preferred() {
        let client = OpenAiClient::new(None, Some("gpt-4.1".to_string()));
        assert_eq!(client.models(), &["gpt-4.1", "gpt-4o-mini", "gpt-4o"]);
    }

    #[test]
    fn test_model_chain_without_preferred() {
        let client = OpenAiClient::new(None, None);
        assert_eq!(client.models(), &["gpt-4o-mini", "gpt-4o"]);
    }

    #[test]
    fn test_temperature_gating() {
        assert!(supports_temperature("gpt-4o"));
        assert!(supports_temperature("gpt-4o-mini"));
        assert!(!supports_temperature("gpt-5"));
        assert!(!supports_temperature("gpt-5-chat-latest"));
        // gpt-50 would be a different family
        assert!(supports_temperature("gpt-50"));
    }

    #[tokio::test]
    async fn test_keyless_client_returns_placeholder() {
        let client = OpenAiClient::new(None, None);
        let summary = client.generate("irrelevant").await.unwrap();
        assert_eq!(summary, PLACEHOLDER_SUMMARY);
    }
}
