const BOILERPLATE_PREFIXES: [&str; 8] = [
    "Here's the improved prompt:",
    "Here is the improved prompt:",
    "The refined prompt is:",
    "Refined prompt:",
    "Improved prompt:",
    "Here's the optimized version:",
    "Here is the optimized version:",
    "The optimized prompt:",
];

const BOILERPLATE_SUFFIXES: [&str; 5] = [
    "This version is more concise while maintaining clarity.",
    "This refined version provides better clarity.",
    "This improvement adds more specificity.",
    "This version is more professional.",
    "This structure is more organized.",
];

const QUOTES: [&str; 3] = ["\"\"\"", "\"", "'"];

/// Strips the framing models tend to wrap around a rewritten prompt.
///
/// Removes at most one known lead-in phrase, one known closing remark and one
/// layer of surrounding quotes. Phrase matching ignores ASCII case.
///
/// # Examples
///
/// ```
/// use eprompt_engine::extract_refined_content;
///
/// let raw = "Here is the improved prompt:\n\"Summarise the report in 3 bullets.\"";
/// assert_eq!(extract_refined_content(raw), "Summarise the report in 3 bullets.");
/// ```
#[must_use]
pub fn extract_refined_content(response: &str) -> String {
    let mut content = response.trim();

    if let Some(rest) = BOILERPLATE_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(content, prefix))
    {
        content = rest.trim();
    }

    if let Some(rest) = BOILERPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(content, suffix))
    {
        content = rest.trim();
    }

    if let Some(quote) = QUOTES
        .iter()
        .find(|quote| content.starts_with(**quote) && content.ends_with(**quote))
    {
        // A lone quote, or one whose opening and closing marks overlap, unwraps to nothing.
        content = content
            .get(quote.len()..content.len().saturating_sub(quote.len()))
            .unwrap_or_default()
            .trim();
    }

    content.to_owned()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..split])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_quotes_unwrap_to_empty() {
        assert_eq!(extract_refined_content("\""), "");
        assert_eq!(extract_refined_content("\"\"\""), "");
        assert_eq!(extract_refined_content("Refined prompt: ''"), "");
    }

    #[test]
    fn plain_content_is_only_trimmed() {
        assert_eq!(extract_refined_content("  Write a poem.  \n"), "Write a poem.");
    }

    #[test]
    fn strips_prefix_case_insensitively() {
        assert_eq!(
            extract_refined_content("REFINED PROMPT:   List three risks."),
            "List three risks."
        );
    }

    #[test]
    fn strips_suffix_after_prefix() {
        let raw = "Improved prompt: Explain recursion simply.\n\nThis version is more concise while maintaining clarity.";
        assert_eq!(extract_refined_content(raw), "Explain recursion simply.");
    }

    #[test]
    fn removes_one_layer_of_quotes() {
        assert_eq!(extract_refined_content("\"\"\"\n  Do the thing\n\"\"\""), "Do the thing");
        assert_eq!(extract_refined_content("'single'"), "single");
        assert_eq!(extract_refined_content("\"\"nested\"\""), "\"nested\"");
    }

    #[test]
    fn unbalanced_quotes_are_kept() {
        assert_eq!(extract_refined_content("\"open only"), "\"open only");
        assert_eq!(extract_refined_content("'mixed\""), "'mixed\"");
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        assert_eq!(extract_refined_content("✂️"), "✂️");
        assert_eq!(extract_refined_content("短い"), "短い");
    }
}
