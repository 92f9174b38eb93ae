//! Splits completion output into named sections.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Name of the section that collects text before the first heading.
pub const MAIN_SECTION: &str = "Main Content";

#[allow(clippy::expect_used)]
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s+(.+)$").expect("heading pattern is valid"));

#[allow(clippy::expect_used)]
static BOLD_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*:?\s*$").expect("bold label pattern is valid"));

/// Named sections in the order they first appeared.
///
/// Serializes as a JSON object keyed by section name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseSections {
    entries: Vec<(String, String)>,
}

impl ResponseSections {
    /// Creates an empty set of sections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the body of the named section.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, body)| body.as_str())
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no section collected any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, body)` pairs in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }

    fn insert(&mut self, name: String, body: String) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = body,
            None => self.entries.push((name, body)),
        }
    }
}

impl Serialize for ResponseSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, body) in &self.entries {
            map.serialize_entry(name, body)?;
        }
        map.end()
    }
}

/// Splits `response` at markdown headings (`# Title`) and bold labels
/// (`**Title**` or `**Title**:`).
///
/// Text before the first heading lands in [`MAIN_SECTION`]. Headings that
/// collect no lines produce no section. A repeated heading replaces the
/// earlier body.
#[must_use]
pub fn parse_response_sections(response: &str) -> ResponseSections {
    let mut sections = ResponseSections::new();
    let mut current = MAIN_SECTION.to_owned();
    let mut lines: Vec<&str> = Vec::new();

    for line in response.split('\n') {
        let trimmed = line.trim();
        let heading = HEADING_RE
            .captures(trimmed)
            .or_else(|| BOLD_LABEL_RE.captures(trimmed))
            .and_then(|caps| caps.get(1));

        if let Some(name) = heading {
            flush(&mut sections, &current, &mut lines);
            current = name.as_str().trim().to_owned();
        } else {
            lines.push(line);
        }
    }
    flush(&mut sections, &current, &mut lines);

    sections
}

fn flush(sections: &mut ResponseSections, name: &str, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        sections.insert(name.to_owned(), lines.join("\n").trim().to_owned());
        lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_main_content() {
        let sections = parse_response_sections("just an answer\nwith two lines");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get(MAIN_SECTION), Some("just an answer\nwith two lines"));
    }

    #[test]
    fn splits_on_headings_and_bold_labels() {
        let response = "Intro line\n\n## Overview\nFirst part\n**Details**:\n- item one\n- item two\n### Summary\nDone";
        let sections = parse_response_sections(response);

        let names: Vec<&str> = sections.iter().map(|(name, _)| name).collect();
        assert_eq!(names, [MAIN_SECTION, "Overview", "Details", "Summary"]);
        assert_eq!(sections.get(MAIN_SECTION), Some("Intro line"));
        assert_eq!(sections.get("Details"), Some("- item one\n- item two"));
        assert_eq!(sections.get("Summary"), Some("Done"));
    }

    #[test]
    fn headings_without_body_are_dropped() {
        let sections = parse_response_sections("# Empty\n# Filled\ncontent");
        assert!(sections.get("Empty").is_none());
        assert_eq!(sections.get("Filled"), Some("content"));
        assert!(sections.get(MAIN_SECTION).is_none());
    }

    #[test]
    fn repeated_heading_overwrites_in_place() {
        let sections = parse_response_sections("# A\nfirst\n# B\nmiddle\n# A\nsecond");
        let names: Vec<&str> = sections.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(sections.get("A"), Some("second"));
    }

    #[test]
    fn inline_bold_is_not_a_heading() {
        let sections = parse_response_sections("Use **bold** words here\n#nospace");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let sections = parse_response_sections("intro\n## Zeta\nz\n## Alpha\na");
        let json = serde_json::to_string(&sections).expect("serialize");
        assert_eq!(json, r#"{"Main Content":"intro","Zeta":"z","Alpha":"a"}"#);
    }

    #[test]
    fn empty_response_keeps_blank_main_section() {
        let sections = parse_response_sections("");
        assert_eq!(sections.get(MAIN_SECTION), Some(""));
    }
}
