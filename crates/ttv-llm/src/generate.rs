//! Script and search-term generation with bounded retries.

use regex::Regex;
use tracing::{info, warn};

use crate::client::LlmClient;
use crate::error::{LlmError, LlmResult};
use crate::prompt;
use crate::retry::{retry_async, RetryConfig};

/// Retry budget per generation call, matching the reference behavior.
const MAX_RETRIES: u32 = 5;

/// Generate a narration script for the given subject.
///
/// The raw model output is cleaned of markdown artifacts and bracketed
/// stage directions before being returned.
pub async fn generate_script(
    client: &LlmClient,
    video_subject: &str,
    language: &str,
    paragraph_number: u32,
) -> LlmResult<String> {
    let prompt = prompt::script_prompt(video_subject, paragraph_number, language);
    info!(subject = %video_subject, "generating video script");

    let config = RetryConfig::new("generate_script").with_max_retries(MAX_RETRIES);
    let script = retry_async(&config, || async {
        let response = client.generate(&prompt).await?;
        let cleaned = clean_script(&response);
        if cleaned.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(cleaned)
    })
    .await?;

    info!(chars = script.len(), "video script completed");
    Ok(script)
}

/// Generate stock-footage search terms for the given subject and script.
///
/// The model is asked for a JSON array of strings; responses that bury
/// the array in prose are salvaged by extracting the first `[...]` span.
pub async fn generate_terms(
    client: &LlmClient,
    video_subject: &str,
    video_script: &str,
    amount: u32,
) -> LlmResult<Vec<String>> {
    let prompt = prompt::terms_prompt(video_subject, video_script, amount);
    info!(subject = %video_subject, amount, "generating search terms");

    let config = RetryConfig::new("generate_terms").with_max_retries(MAX_RETRIES);
    let terms = retry_async(&config, || async {
        let response = client.generate(&prompt).await?;
        parse_terms(&response)
    })
    .await?;

    info!(count = terms.len(), "search terms completed");
    Ok(terms)
}

/// Strip markdown leftovers and bracketed directions from a script.
fn clean_script(response: &str) -> String {
    let no_marks = response.replace(['*', '#'], "");
    let no_brackets = Regex::new(r"\[[^\]]*\]")
        .expect("static regex")
        .replace_all(&no_marks, "");
    let no_parens = Regex::new(r"\([^)]*\)")
        .expect("static regex")
        .replace_all(&no_brackets, "");

    no_parens
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse a JSON array of strings, salvaging the first bracketed span on
/// malformed output.
fn parse_terms(response: &str) -> LlmResult<Vec<String>> {
    let direct: Result<Vec<String>, _> = serde_json::from_str(response.trim());
    let terms = match direct {
        Ok(terms) => terms,
        Err(_) => {
            let span = Regex::new(r"\[.*\]")
                .expect("static regex")
                .find(response)
                .ok_or_else(|| {
                    warn!("no JSON array found in terms response");
                    LlmError::parse("response is not a JSON array of strings")
                })?;
            serde_json::from_str(span.as_str())
                .map_err(|e| LlmError::parse(format!("salvaged array is invalid: {e}")))?
        }
    };

    if terms.is_empty() {
        return Err(LlmError::parse("provider returned an empty term list"));
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_script_strips_markdown_and_directions() {
        let raw = "## Title\n\nSpring *blooms* [camera pans] everywhere (soft music).\n\n  ";
        let cleaned = clean_script(raw);
        assert_eq!(cleaned, "Title\n\nSpring blooms  everywhere .");
    }

    #[test]
    fn parse_terms_accepts_clean_json() {
        let terms = parse_terms(r#"["spring", "flower sea", "blossom"]"#).unwrap();
        assert_eq!(terms, vec!["spring", "flower sea", "blossom"]);
    }

    #[test]
    fn parse_terms_salvages_embedded_array() {
        let terms =
            parse_terms(r#"Sure! Here are the terms: ["sky", "tree"] — enjoy."#).unwrap();
        assert_eq!(terms, vec!["sky", "tree"]);
    }

    #[test]
    fn parse_terms_rejects_prose() {
        assert!(parse_terms("I could not produce terms.").is_err());
        assert!(parse_terms("[]").is_err());
    }
}
