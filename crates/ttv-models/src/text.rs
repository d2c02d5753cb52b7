//! Script text utilities.

/// Punctuation that ends a subtitle line, across Latin and CJK scripts.
const PUNCTUATIONS: &[char] = &[
    '?', ',', '.', '、', ';', ':', '!', '…', '？', '，', '。', '；', '：', '！',
];

/// Split a script into subtitle lines on punctuation boundaries.
///
/// Newlines always break a line. A dot between two digits ("2.5% fee")
/// is part of a number, not a sentence boundary. Empty segments are
/// dropped.
pub fn split_script_lines(script: &str) -> Vec<String> {
    let chars: Vec<char> = script.chars().collect();
    let mut lines = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            push_line(&mut lines, &mut current);
            continue;
        }

        if ch == '.' {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
            if prev_digit && next_digit {
                current.push(ch);
                continue;
            }
        }

        if PUNCTUATIONS.contains(&ch) {
            push_line(&mut lines, &mut current);
        } else {
            current.push(ch);
        }
    }

    push_line(&mut lines, &mut current);
    lines
}

fn push_line(lines: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_sentence_punctuation() {
        let lines = split_script_lines("Hello world. How are you? Fine!");
        assert_eq!(lines, vec!["Hello world", "How are you", "Fine"]);
    }

    #[test]
    fn preserves_decimal_points() {
        let lines = split_script_lines("withdraw 10,000, charged at 2.5% fee.");
        assert_eq!(lines, vec!["withdraw 10", "000", "charged at 2.5% fee"]);
    }

    #[test]
    fn splits_on_newlines_and_drops_empties() {
        let lines = split_script_lines("first line\n\nsecond line.\n");
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn handles_cjk_punctuation() {
        let lines = split_script_lines("春天的花海，是大自然的画卷。");
        assert_eq!(lines, vec!["春天的花海", "是大自然的画卷"]);
    }
}
