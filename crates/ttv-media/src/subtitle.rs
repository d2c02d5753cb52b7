//! SRT subtitle generation from a narration script.

use ttv_models::split_script_lines;

/// Build an SRT document for `script`, spreading `total_duration` seconds
/// across the script's sentences in proportion to their length.
///
/// Returns an empty string when the script contains no usable sentences.
pub fn build_srt(script: &str, total_duration: f64) -> String {
    let lines = split_script_lines(script);
    if lines.is_empty() || total_duration <= 0.0 {
        return String::new();
    }

    let total_chars: usize = lines.iter().map(|l| l.chars().count()).sum();
    let mut cues = String::new();
    let mut cursor = 0.0f64;

    for (index, line) in lines.iter().enumerate() {
        let weight = if total_chars == 0 {
            1.0 / lines.len() as f64
        } else {
            line.chars().count() as f64 / total_chars as f64
        };
        let start = cursor;
        let end = if index == lines.len() - 1 {
            // Absorb rounding drift into the final cue.
            total_duration
        } else {
            cursor + total_duration * weight
        };
        cursor = end;

        cues.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(start),
            format_timestamp(end),
            line
        ));
    }

    cues
}

/// Format seconds as an SRT timestamp, `HH:MM:SS,mmm`.
fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_srt_formatted() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(61.5), "00:01:01,500");
        assert_eq!(format_timestamp(3_725.042), "01:02:05,042");
    }

    #[test]
    fn cues_cover_the_full_duration() {
        let srt = build_srt("First sentence. Second one is a bit longer.", 10.0);
        assert!(srt.starts_with("1\n00:00:00,000 --> "));
        assert!(srt.contains("First sentence"));
        assert!(srt.contains("Second one is a bit longer"));
        assert!(srt.trim_end().ends_with("Second one is a bit longer"));
        // Last cue ends exactly at the total duration.
        assert!(srt.contains("--> 00:00:10,000"));
    }

    #[test]
    fn cue_indices_are_sequential() {
        let srt = build_srt("One. Two. Three.", 6.0);
        let indices: Vec<&str> = srt
            .lines()
            .filter(|l| l.chars().all(|c| c.is_ascii_digit()) && !l.is_empty())
            .collect();
        assert_eq!(indices, vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_script_yields_empty_output() {
        assert_eq!(build_srt("", 10.0), "");
        assert_eq!(build_srt("Hello world.", 0.0), "");
    }
}
