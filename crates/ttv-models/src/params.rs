//! Generation request parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_paragraphs() -> u32 {
    1
}

fn default_terms_amount() -> u32 {
    5
}

fn default_clip_count() -> u32 {
    3
}

/// Parameters for a full video generation task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VideoParams {
    /// Subject the script is written about
    #[validate(length(min = 1, max = 500))]
    pub video_subject: String,
    /// Target language, empty for model default
    #[serde(default)]
    pub video_language: String,
    /// Number of script paragraphs
    #[serde(default = "default_paragraphs")]
    #[validate(range(min = 1, max = 10))]
    pub paragraph_number: u32,
    /// Number of stock search terms to generate
    #[serde(default = "default_terms_amount")]
    #[validate(range(min = 1, max = 10))]
    pub terms_amount: u32,
    /// Number of stock clips to fetch
    #[serde(default = "default_clip_count")]
    #[validate(range(min = 1, max = 10))]
    pub clip_count: u32,
    /// Optional background music file name from the songs directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_file: Option<String>,
}

/// Parameters for an audio-only task. Same inputs as a full video task;
/// the pipeline simply stops after the audio stage.
pub type AudioParams = VideoParams;

/// Parameters for a subtitle-only task.
pub type SubtitleParams = VideoParams;

/// Parameters for synchronous script generation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScriptParams {
    #[validate(length(min = 1, max = 500))]
    pub video_subject: String,
    #[serde(default)]
    pub video_language: String,
    #[serde(default = "default_paragraphs")]
    #[validate(range(min = 1, max = 10))]
    pub paragraph_number: u32,
}

/// Parameters for synchronous search term generation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TermsParams {
    #[validate(length(min = 1, max = 500))]
    pub video_subject: String,
    #[validate(length(min = 1))]
    pub video_script: String,
    #[serde(default = "default_terms_amount")]
    #[validate(range(min = 1, max = 10))]
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_params_defaults() {
        let params: VideoParams =
            serde_json::from_str(r#"{"video_subject": "Spring Flower Sea"}"#).unwrap();
        assert_eq!(params.paragraph_number, 1);
        assert_eq!(params.terms_amount, 5);
        assert_eq!(params.clip_count, 3);
        assert!(params.video_language.is_empty());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn empty_subject_fails_validation() {
        let params: ScriptParams =
            serde_json::from_str(r#"{"video_subject": ""}"#).unwrap();
        assert!(params.validate().is_err());
    }
}
