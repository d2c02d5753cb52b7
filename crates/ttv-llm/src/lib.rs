//! LLM text generation for the TTV backend.
//!
//! One client fronts two providers (OpenAI chat completions, Gemini
//! generateContent). On top of it sit the two generation routines the
//! pipeline needs: a video script and stock-footage search terms, each
//! with its own bounded retry loop.

pub mod client;
pub mod config;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod retry;

pub use client::LlmClient;
pub use config::{LlmConfig, Provider};
pub use error::{LlmError, LlmResult};
pub use generate::{generate_script, generate_terms};
pub use retry::{retry_async, RetryConfig};
