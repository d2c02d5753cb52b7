//! Provider-switching LLM client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LlmConfig, Provider};
use crate::error::{LlmError, LlmResult};

/// Chat client over OpenAI or Gemini, selected by configuration.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

// OpenAI chat completions wire format.

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
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

// Gemini generateContent wire format.

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

impl LlmClient {
    /// Create a client for the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> LlmResult<Self> {
        Ok(Self::new(LlmConfig::from_env()?))
    }

    /// Which provider this client talks to.
    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    /// Send a single-turn prompt and return the generated text.
    pub async fn generate(&self, prompt: &str) -> LlmResult<String> {
        debug!(provider = %self.config.provider, model = %self.config.model, "LLM request");
        let text = match self.config.provider {
            Provider::OpenAi => self.call_openai(prompt).await?,
            Provider::Gemini => self.call_gemini(prompt).await?,
        };
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(strip_markdown_fences(&text).to_string())
    }

    async fn call_openai(&self, prompt: &str) -> LlmResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    async fn call_gemini(&self, prompt: &str) -> LlmResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 2048,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: GeminiResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Strip a surrounding ```json ... ``` fence, if present.
fn strip_markdown_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn openai_config(base_url: String) -> LlmConfig {
        LlmConfig {
            provider: Provider::OpenAi,
            api_key: "test-key".into(),
            base_url,
            model: "gpt-4o-mini".into(),
        }
    }

    fn gemini_config(base_url: String) -> LlmConfig {
        LlmConfig {
            provider: Provider::Gemini,
            api_key: "test-key".into(),
            base_url,
            model: "gemini-2.0-flash".into(),
        }
    }

    #[test]
    fn strips_markdown_fences() {
        assert_eq!(strip_markdown_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_markdown_fences("plain text"), "plain text");
    }

    #[tokio::test]
    async fn openai_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "a short script"}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(openai_config(server.uri()));
        let text = client.generate("write a script").await.unwrap();
        assert_eq!(text, "a short script");
    }

    #[tokio::test]
    async fn gemini_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "```json\n[\"sky\"]\n```"}]}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(gemini_config(server.uri()));
        let text = client.generate("give me terms").await.unwrap();
        assert_eq!(text, "[\"sky\"]");
    }

    #[tokio::test]
    async fn non_2xx_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = LlmClient::new(openai_config(server.uri()));
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn empty_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(openai_config(server.uri()));
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
