//! Required-field validation and context sanitization.

use std::collections::BTreeMap;

use eprompt_primitives::{Context, ContextValue};

use crate::variables::extract_template_variables;

/// Context after sanitization: every value rendered to escaped, trimmed text.
pub type SanitizedContext = BTreeMap<String, String>;

/// Returns the required fields that are absent or blank in `context`.
///
/// A field is missing when its key is absent, its value is `null`, or its
/// value is an empty or whitespace-only string. The result keeps the order of
/// `required_fields`.
///
/// # Examples
///
/// ```
/// use eprompt_primitives::{Context, ContextValue};
/// use eprompt_templates::validate_required_fields;
///
/// let mut context = Context::new();
/// context.insert("name".into(), ContextValue::text("John"));
///
/// let required = ["name", "role", "task"].map(String::from);
/// assert_eq!(validate_required_fields(&required, &context), ["role", "task"]);
/// ```
#[must_use]
pub fn validate_required_fields(required_fields: &[String], context: &Context) -> Vec<String> {
    required_fields
        .iter()
        .filter(|field| context.get(*field).is_none_or(ContextValue::is_blank))
        .cloned()
        .collect()
}

/// Converts every context value to text safe to hand to the renderer.
///
/// Placeholder delimiters inside values are escaped (`{{` becomes `\{\{`,
/// `}}` becomes `\}\}`) so that supplied text is never interpreted as template
/// syntax, then the text is trimmed. `null` becomes the empty string.
#[must_use]
pub fn sanitize_context(context: &Context) -> SanitizedContext {
    context
        .iter()
        .map(|(key, value)| (key.clone(), sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: &ContextValue) -> String {
    if value.is_null() {
        return String::new();
    }
    value
        .to_string()
        .replace("{{", r"\{\{")
        .replace("}}", r"\}\}")
        .trim()
        .to_owned()
}

/// Returns the template variables that received a non-blank sanitized value.
#[must_use]
pub fn used_context_fields(template: &str, sanitized: &SanitizedContext) -> Vec<String> {
    extract_template_variables(template)
        .into_iter()
        .filter(|var| {
            sanitized
                .get(var)
                .is_some_and(|value| !value.trim().is_empty())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(entries: &[(&str, ContextValue)]) -> Context {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn all_required_present() {
        let ctx = context(&[("name", "John".into()), ("role", "Developer".into())]);
        assert!(validate_required_fields(&fields(&["name", "role"]), &ctx).is_empty());
    }

    #[test]
    fn missing_fields_follow_required_order() {
        let ctx = context(&[("name", "John".into())]);
        let missing = validate_required_fields(&fields(&["task", "name", "role"]), &ctx);
        assert_eq!(missing, ["task", "role"]);
    }

    #[test]
    fn blank_strings_and_null_are_missing() {
        let ctx = context(&[
            ("name", "".into()),
            ("role", "   ".into()),
            ("task", ContextValue::Null),
            ("ok", "value".into()),
        ]);
        let missing = validate_required_fields(&fields(&["name", "role", "task", "ok"]), &ctx);
        assert_eq!(missing, ["name", "role", "task"]);
    }

    #[test]
    fn falsy_scalars_are_present() {
        let ctx = context(&[("count", 0_i64.into()), ("flag", false.into())]);
        assert!(validate_required_fields(&fields(&["count", "flag"]), &ctx).is_empty());
    }

    #[test]
    fn escapes_delimiters_and_stringifies() {
        let ctx = context(&[
            ("name", "John {{evil}}".into()),
            ("role", "  Dev  ".into()),
            ("count", 42_i64.into()),
            ("active", true.into()),
            ("none", ContextValue::Null),
        ]);

        let sanitized = sanitize_context(&ctx);
        assert_eq!(sanitized["name"], r"John \{\{evil\}\}");
        assert_eq!(sanitized["role"], "Dev");
        assert_eq!(sanitized["count"], "42");
        assert_eq!(sanitized["active"], "true");
        assert_eq!(sanitized["none"], "");
        assert_eq!(sanitized.len(), ctx.len());
    }

    #[test]
    fn used_fields_ignore_empty_and_unused_values() {
        let ctx = context(&[
            ("name", "John".into()),
            ("company", "".into()),
            ("role", ContextValue::Null),
            ("unused", "value".into()),
        ]);
        let used = used_context_fields("Hello {{name}} from {{company}} as {{role}}", &sanitize_context(&ctx));
        assert_eq!(used, ["name"]);
    }
}
