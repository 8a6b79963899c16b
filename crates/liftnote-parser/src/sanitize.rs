//! Sanitizer: strip markdown code fences that models wrap around JSON.
//!
//! Only fences at the very start and end of the answer are removed, each
//! independently, so a missing closing fence still yields the body.  The
//! result is not checked for being JSON.

const FENCE: &str = "```";

/// Remove an optional opening fence (with or without a language tag), an
/// optional closing fence, and surrounding whitespace.
pub fn clean(raw: &str) -> &str {
    let text = strip_opening_fence(raw.trim());
    let text = text.trim_end();
    let text = text.strip_suffix(FENCE).unwrap_or(text);
    text.trim()
}

fn strip_opening_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // Info string such as `json`, `JSON` or `json5`.
    let tag_len = if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        rest.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
            .unwrap_or(rest.len())
    } else {
        0
    };

    &rest[tag_len..]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[{"exercise":"Plank","weight":0,"sets":3,"reps":null,"duration":30}]"#;

    #[test]
    fn no_fence_is_trimmed_only() {
        assert_eq!(clean(BODY), BODY);
        assert_eq!(clean(&format!("  \n{BODY}\n ")), BODY);
    }

    #[test]
    fn json_tagged_fence() {
        assert_eq!(clean(&format!("```json\n{BODY}\n```")), BODY);
    }

    #[test]
    fn untagged_fence() {
        assert_eq!(clean(&format!("```\n{BODY}\n```")), BODY);
    }

    #[test]
    fn uppercase_tag_and_surrounding_whitespace() {
        assert_eq!(clean(&format!("\n  ```JSON\n{BODY}\n```  \n")), BODY);
    }

    #[test]
    fn single_line_fence() {
        assert_eq!(clean(&format!("```json{BODY}```")), BODY);
        assert_eq!(clean(&format!("```{BODY}```")), BODY);
    }

    #[test]
    fn missing_closing_fence() {
        assert_eq!(clean(&format!("```json\n{BODY}\n")), BODY);
    }

    #[test]
    fn missing_opening_fence() {
        assert_eq!(clean(&format!("{BODY}\n```")), BODY);
    }

    #[test]
    fn empty_fence() {
        assert_eq!(clean("```json\n```"), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn prose_is_left_for_the_validator() {
        let raw = "Here you go: []";
        assert_eq!(clean(raw), raw);
    }
}
