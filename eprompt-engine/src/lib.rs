//! Prompt execution on top of the template engine.
//!
//! [`PromptRunner`] renders a template and sends the prompt to a completion
//! client. [`Refiner`] uses the runner to rewrite prompts with one of the
//! tools in the static [`catalog`].

#![warn(missing_docs, clippy::pedantic)]

pub mod catalog;
mod cleanup;
mod error;
mod refiner;
mod runner;

pub use catalog::{RefinerTool, find_tool, tools};
pub use cleanup::extract_refined_content;
pub use error::{EngineError, EngineResult};
pub use refiner::{BatchEntry, BatchRefinement, FailedRefinement, Refinement, Refiner};
pub use runner::{PromptRunner, RunOutput};
