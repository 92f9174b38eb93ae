//! Prompt generation and preview.

use chrono::Utc;
use eprompt_primitives::{Context, ContextValue, Template};
use tracing::{debug, warn};

use crate::context::{sanitize_context, used_context_fields, validate_required_fields};
use crate::output::{PreviewMetadata, PreviewResult, PromptMetadata, RenderedPrompt};
use crate::render::{Renderer, placeholder};
use crate::variables::extract_template_variables;

/// Renders templates into prompts.
///
/// The engine holds a preconfigured template environment and no other state,
/// so a single instance can be shared across requests.
///
/// # Examples
///
/// ```
/// use eprompt_primitives::{Context, Template};
/// use eprompt_templates::PromptEngine;
///
/// let template = Template::builder("greet", "Greeting", "Hello {{name}}!")
///     .required_fields(["name"])
///     .build();
/// let mut context = Context::new();
/// context.insert("name".into(), "Ada".into());
///
/// let rendered = PromptEngine::new().generate(&template, &context);
/// assert_eq!(rendered.prompt, "Hello Ada!");
/// assert!(rendered.is_complete());
/// ```
#[derive(Debug, Default)]
pub struct PromptEngine {
    renderer: Renderer,
}

impl PromptEngine {
    /// Creates an engine with the default rendering environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `template` against `context`.
    ///
    /// Missing required fields do not abort the render: unbound placeholders
    /// are shown as `[name]` and reported in `missing_fields`. If the body
    /// cannot be rendered at all the prompt is empty and the failure is
    /// recorded in `metadata.error`.
    #[must_use]
    pub fn generate(&self, template: &Template, context: &Context) -> RenderedPrompt {
        let missing_fields = validate_required_fields(template.required_fields(), context);
        let sanitized = sanitize_context(context);

        match self.renderer.render(template.body(), &sanitized) {
            Ok(rendered) => {
                debug!(
                    template_id = template.id(),
                    missing = missing_fields.len(),
                    "generated prompt"
                );
                RenderedPrompt {
                    prompt: rendered.trim().to_owned(),
                    context_used: used_context_fields(template.body(), &sanitized),
                    metadata: PromptMetadata {
                        template_id: template.id().to_owned(),
                        template_name: template.name().to_owned(),
                        generated_at: Utc::now(),
                        has_required_fields: missing_fields.is_empty(),
                        error: None,
                    },
                    missing_fields,
                }
            }
            Err(err) => {
                warn!(template_id = template.id(), %err, "prompt generation failed");
                RenderedPrompt {
                    prompt: String::new(),
                    missing_fields: template.required_fields().to_vec(),
                    context_used: Vec::new(),
                    metadata: PromptMetadata {
                        template_id: template.id().to_owned(),
                        template_name: template.name().to_owned(),
                        generated_at: Utc::now(),
                        has_required_fields: false,
                        error: Some(err.to_string()),
                    },
                }
            }
        }
    }

    /// Renders a best-effort preview of `template`.
    ///
    /// Never fails. Variables without a usable value appear as `[name]`; the
    /// provided and missing lists always partition `variables_found`.
    #[must_use]
    pub fn preview(&self, template: &Template, context: &Context) -> PreviewResult {
        let variables_found = extract_template_variables(template.body());
        let mut variables_provided = Vec::new();
        let mut variables_missing = Vec::new();
        let mut filled = Context::new();

        for var in &variables_found {
            let value = match context.get(var).filter(|value| value.is_supplied()) {
                Some(value) => {
                    variables_provided.push(var.clone());
                    value.clone()
                }
                None => {
                    variables_missing.push(var.clone());
                    ContextValue::Text(placeholder(var))
                }
            };
            filled.insert(var.clone(), value);
        }

        let mut metadata = PreviewMetadata {
            template_id: template.id().to_owned(),
            template_name: template.name().to_owned(),
            generated_at: Utc::now(),
            error: None,
        };

        let preview = match self.renderer.render(template.body(), &sanitize_context(&filled)) {
            Ok(rendered) => rendered.trim().to_owned(),
            Err(err) => {
                warn!(template_id = template.id(), %err, "preview render failed");
                variables_provided.clear();
                variables_missing.clone_from(&variables_found);
                metadata.error = Some(err.to_string());
                format!("Error rendering template: {err}")
            }
        };

        PreviewResult {
            preview,
            variables_found,
            variables_provided,
            variables_missing,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> Template {
        Template::builder(
            "user-story",
            "User Story",
            "As a {{role}}, I want to {{goal}} so that {{benefit}}.",
        )
        .required_fields(["role", "goal", "benefit"])
        .build()
    }

    fn context(entries: &[(&str, ContextValue)]) -> Context {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn renders_full_context() {
        let ctx = context(&[
            ("role", "developer".into()),
            ("goal", "ship auth".into()),
            ("benefit", "secure accounts".into()),
        ]);

        let rendered = PromptEngine::new().generate(&story(), &ctx);

        assert_eq!(
            rendered.prompt,
            "As a developer, I want to ship auth so that secure accounts."
        );
        assert!(rendered.missing_fields.is_empty());
        assert_eq!(rendered.context_used, ["benefit", "goal", "role"]);
        assert!(rendered.metadata.has_required_fields);
        assert!(rendered.metadata.error.is_none());
        assert_eq!(rendered.metadata.template_id, "user-story");
    }

    #[test]
    fn partial_context_uses_placeholders() {
        let ctx = context(&[("role", "developer".into())]);

        let rendered = PromptEngine::new().generate(&story(), &ctx);

        assert_eq!(rendered.missing_fields, ["goal", "benefit"]);
        assert!(rendered.prompt.contains("[goal]"));
        assert!(rendered.prompt.contains("[benefit]"));
        assert!(rendered.prompt.starts_with("As a developer"));
        assert_eq!(rendered.context_used, ["role"]);
        assert!(!rendered.metadata.has_required_fields);
    }

    #[test]
    fn injected_delimiters_are_not_rendered() {
        let template = Template::builder("t", "T", "Task: {{task}}")
            .required_fields(["task"])
            .build();
        let ctx = context(&[("task", "write {{malicious}} code".into())]);

        let rendered = PromptEngine::new().generate(&template, &ctx);

        assert_eq!(rendered.prompt, r"Task: write \{\{malicious\}\} code");
        assert!(rendered.missing_fields.is_empty());
    }

    #[test]
    fn syntax_error_yields_empty_prompt() {
        let template = Template::builder("bad", "Bad", "{% for %}{{name}}")
            .required_fields(["name"])
            .build();
        let ctx = context(&[("name", "x".into())]);

        let rendered = PromptEngine::new().generate(&template, &ctx);

        assert!(rendered.prompt.is_empty());
        assert_eq!(rendered.missing_fields, ["name"]);
        assert!(rendered.context_used.is_empty());
        assert!(!rendered.metadata.has_required_fields);
        assert!(rendered.metadata.error.is_some());
    }

    #[test]
    fn missing_fields_ignore_optional_and_undeclared() {
        let template = Template::builder("t", "T", "{{a}} {{b}} {{c}}")
            .required_fields(["a"])
            .optional_fields(["b"])
            .build();

        let rendered = PromptEngine::new().generate(&template, &Context::new());

        assert_eq!(rendered.missing_fields, ["a"]);
        assert_eq!(rendered.prompt, "[a] [b] [c]");
    }

    #[test]
    fn preview_partitions_found_variables() {
        let ctx = context(&[
            ("role", "developer".into()),
            ("goal", "".into()),
            ("benefit", ContextValue::Null),
            ("extra", "unused".into()),
        ]);

        let preview = PromptEngine::new().preview(&story(), &ctx);

        assert_eq!(preview.variables_found, ["benefit", "goal", "role"]);
        assert_eq!(preview.variables_provided, ["role"]);
        assert_eq!(preview.variables_missing, ["benefit", "goal"]);
        assert_eq!(
            preview.preview,
            "As a developer, I want to [goal] so that [benefit]."
        );
        assert!(preview.metadata.error.is_none());
    }

    #[test]
    fn preview_counts_falsy_scalars_as_provided() {
        let template = Template::builder("t", "T", "{{count}} {{flag}}").build();
        let ctx = context(&[("count", 0_i64.into()), ("flag", false.into())]);

        let preview = PromptEngine::new().preview(&template, &ctx);

        assert_eq!(preview.preview, "0 false");
        assert_eq!(preview.variables_provided, ["count", "flag"]);
    }

    #[test]
    fn preview_reports_render_errors() {
        let template = Template::builder("bad", "Bad", "{{name}} {% if %}").build();

        let preview = PromptEngine::new().preview(&template, &Context::new());

        assert!(preview.preview.starts_with("Error rendering template: "));
        assert!(preview.variables_provided.is_empty());
        assert_eq!(preview.variables_missing, ["name"]);
        assert!(preview.metadata.error.is_some());
    }
}
