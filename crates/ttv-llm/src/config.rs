//! LLM provider configuration.

use std::fmt;

use crate::error::{LlmError, LlmResult};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(LlmError::config(format!("unknown provider: {other}"))),
        }
    }
}

/// Resolved provider settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    /// Create config from environment variables.
    ///
    /// `LLM_PROVIDER` selects the provider; the matching
    /// `{OPENAI,GEMINI}_API_KEY` / `_MODEL_NAME` must be set, missing
    /// values are a configuration error. `_BASE_URL` falls back to the
    /// provider's public endpoint.
    pub fn from_env() -> LlmResult<Self> {
        let provider: Provider = std::env::var("LLM_PROVIDER")
            .map_err(|_| LlmError::config("LLM_PROVIDER is not set"))?
            .parse()?;
        Self::for_provider(provider)
    }

    fn for_provider(provider: Provider) -> LlmResult<Self> {
        let (key_var, url_var, model_var, default_url) = match provider {
            Provider::OpenAi => (
                "OPENAI_API_KEY",
                "OPENAI_BASE_URL",
                "OPENAI_MODEL_NAME",
                "https://api.openai.com/v1",
            ),
            Provider::Gemini => (
                "GEMINI_API_KEY",
                "GEMINI_BASE_URL",
                "GEMINI_MODEL_NAME",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        };

        let api_key = std::env::var(key_var)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LlmError::config(format!("{provider}: api key is not set")))?;
        let model = std::env::var(model_var)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LlmError::config(format!("{provider}: model name is not set")))?;
        let base_url = std::env::var(url_var)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_url.to_string());

        Ok(Self {
            provider,
            api_key,
            base_url,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("claude".parse::<Provider>().is_err());
    }
}
