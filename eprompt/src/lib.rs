//! ePrompt facade.
//!
//! Bundles the workspace crates behind feature flags so callers can pull in
//! only the template engine, or the whole service.
//!
//! ```
//! use eprompt::primitives::{Context, Template};
//! use eprompt::templates::PromptEngine;
//!
//! let template = Template::builder("greet", "Greeting", "Hello {{name}}!")
//!     .required_fields(["name"])
//!     .build();
//! let mut context = Context::new();
//! context.insert("name".to_owned(), "Ada".into());
//!
//! let rendered = PromptEngine::new().generate(&template, &context);
//! assert_eq!(rendered.prompt, "Hello Ada!");
//! ```

#![warn(missing_docs, clippy::pedantic)]

/// Shared data model.
pub use eprompt_primitives as primitives;

/// Template rendering and response parsing (enabled by `templates` feature).
#[cfg(feature = "templates")]
pub use eprompt_templates as templates;

/// Completion clients (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use eprompt_adapters as adapters;

/// Generate-and-run and refinement (enabled by `engine` feature).
#[cfg(feature = "engine")]
pub use eprompt_engine as engine;

/// Environment settings (enabled by `config` feature).
#[cfg(feature = "config")]
pub use eprompt_config as config;

/// Logging bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use eprompt_telemetry as telemetry;

/// HTTP API (enabled by `server` feature).
#[cfg(feature = "server")]
pub use eprompt_server as server;
