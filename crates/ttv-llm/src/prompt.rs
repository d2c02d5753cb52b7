//! Prompt templates for script and search-term generation.

/// Prompt for generating a narration script.
pub fn script_prompt(video_subject: &str, paragraph_number: u32, language: &str) -> String {
    let mut prompt = format!(
        r#"# Role: Video Script Generator

## Goals:
Generate a script for a video, depending on the subject of the video.

## Constraints:
- the script is to be returned as a string with the specified number of paragraphs
- do not under any circumstance reference this prompt in your response
- get straight to the point, don't start with unnecessary things like, "welcome to this video"
- you must not include any type of markdown or formatting in the script, never use a title
- only return the raw content of the script
- do not include "voiceover", "narrator" or similar indicators of what should be spoken
- you must not mention the prompt, or anything about the script itself, never talk about the amount of paragraphs or lines, just write the script

## Initialization:
- video subject: {video_subject}
- number of paragraphs: {paragraph_number}"#
    );

    if !language.is_empty() {
        prompt.push_str(&format!("\n- language: {language}"));
    }

    prompt
}

/// Prompt for generating stock-footage search terms.
pub fn terms_prompt(video_subject: &str, video_script: &str, amount: u32) -> String {
    format!(
        r#"# Role: Video Search Terms Generator

## Goals:
Generate {amount} search terms for stock videos, depending on the subject of a video.

## Constraints:
- the search terms are to be returned as a JSON array of strings
- each search term should consist of 1-3 words, always add the main subject of the video
- you must only return the JSON array of strings, no explanations, no markdown
- the search terms must be related to the subject of the video
- reply with english search terms only

## Context:
### Video Subject
{video_subject}

### Video Script
{video_script}

Please note that you must use English for generating video search terms; Chinese is not accepted."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_prompt_includes_language_only_when_set() {
        let with = script_prompt("Spring Flower Sea", 2, "zh-CN");
        assert!(with.contains("language: zh-CN"));
        assert!(with.contains("number of paragraphs: 2"));

        let without = script_prompt("Spring Flower Sea", 1, "");
        assert!(!without.contains("language:"));
    }

    #[test]
    fn terms_prompt_embeds_the_script() {
        let prompt = terms_prompt("ocean", "waves crashing on rocks", 5);
        assert!(prompt.contains("Generate 5 search terms"));
        assert!(prompt.contains("waves crashing on rocks"));
    }
}
