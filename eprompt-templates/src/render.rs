//! Two-phase template rendering on top of `minijinja`.

use std::fmt;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::context::SanitizedContext;
use crate::variables::extract_template_variables;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A placeholder had no bound value during a strict render.
    #[error("undefined variable in template: {reason}")]
    Undefined {
        /// Detail reported by the template engine.
        reason: String,
    },

    /// Template syntax or evaluation failed.
    #[error("template rendering failed: {reason}")]
    Render {
        /// Reason for the failure.
        reason: String,
    },
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        let reason = err.to_string();
        match err.kind() {
            minijinja::ErrorKind::UndefinedError => Self::Undefined { reason },
            _ => Self::Render { reason },
        }
    }
}

/// Renders template bodies against sanitized context.
///
/// The environment is strict: printing an unbound variable is an error.
/// Block tags trim their trailing newline and leading indentation, and output
/// is never auto-escaped.
pub(crate) struct Renderer {
    env: Environment<'static>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }
}

impl Renderer {
    /// Renders `source`, failing if any placeholder lacks a value.
    pub(crate) fn render_strict(
        &self,
        source: &str,
        context: &SanitizedContext,
    ) -> TemplateResult<String> {
        Ok(self.env.render_str(source, context)?)
    }

    /// Renders `source` after binding every unbound variable to `[name]`.
    ///
    /// Entries already present in `context` are left untouched, even if empty.
    pub(crate) fn render_with_placeholders(
        &self,
        source: &str,
        context: &SanitizedContext,
    ) -> TemplateResult<String> {
        let mut complete = context.clone();
        for var in extract_template_variables(source) {
            complete
                .entry(var)
                .or_insert_with_key(|name| placeholder(name));
        }
        self.render_strict(source, &complete)
    }

    /// Strict render with the placeholder render as fallback.
    pub(crate) fn render(&self, source: &str, context: &SanitizedContext) -> TemplateResult<String> {
        match self.render_strict(source, context) {
            Ok(rendered) => Ok(rendered),
            Err(err) => {
                tracing::debug!(%err, "strict render failed; retrying with placeholders");
                self.render_with_placeholders(source, context)
            }
        }
    }
}

/// Bracketed stand-in for a variable without a value.
pub(crate) fn placeholder(name: &str) -> String {
    format!("[{name}]")
}
