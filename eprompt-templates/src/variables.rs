//! Placeholder discovery.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]+)\s*\}\}").expect("placeholder pattern is valid"));

const CONTROL_PREFIXES: [&str; 6] = ["#", "/", "if ", "for ", "endif", "endfor"];

/// Extracts the distinct placeholder names used by a template body.
///
/// Names are trimmed, deduplicated and returned in lexicographic order.
/// Expressions containing a space and block-helper style tokens
/// (`{{#each}}`, `{{/each}}`, `{{if x}}` ...) are not variables and are
/// skipped.
///
/// # Examples
///
/// ```
/// use eprompt_templates::extract_template_variables;
///
/// let vars = extract_template_variables("Hello {{name}}, welcome to {{ project }}! {{name}}");
/// assert_eq!(vars, ["name", "project"]);
/// ```
#[must_use]
pub fn extract_template_variables(template: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| is_plain_variable(name))
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn is_plain_variable(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(' ')
        && !CONTROL_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sorted_unique_names() {
        let vars = extract_template_variables("Hello {{name}}, welcome to {{project}}!");
        assert_eq!(vars, ["name", "project"]);
    }

    #[test]
    fn collapses_whitespace_variants() {
        let vars = extract_template_variables("{{ goal }} {{goal}} {{  goal}}");
        assert_eq!(vars, ["goal"]);
    }

    #[test]
    fn skips_expressions_with_spaces() {
        let vars = extract_template_variables("As a {{role}}, I need to {{task description}}");
        assert_eq!(vars, ["role"]);
    }

    #[test]
    fn skips_block_helpers_and_statements() {
        let template = "Hello {{name}} {% if condition %}test{% endif %} {{#each items}}{{/each}}";
        assert_eq!(extract_template_variables(template), ["name"]);
    }

    #[test]
    fn empty_when_no_placeholders() {
        assert!(extract_template_variables("plain text, {single} braces").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let vars = ["zeta", "alpha", "mid", "alpha"];
        let as_template: String = vars.iter().map(|v| format!("{{{{{v}}}}} ")).collect();

        let once = extract_template_variables(&as_template);
        let rebuilt: String = once.iter().map(|v| format!("{{{{{v}}}}}")).collect();

        assert_eq!(once, ["alpha", "mid", "zeta"]);
        assert_eq!(extract_template_variables(&rebuilt), once);
    }
}
