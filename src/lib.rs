//! AI-assisted git commit messages and code review
//!
//! Sends git diffs to one of several text-generation providers (`OpenAI`,
//! Claude, Gemini, `OpenRouter`) and turns the reply into a commit message or
//! a severity-tagged review.
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod prompts;
pub mod provider;
pub mod review;
pub mod setup;
pub mod style;

// Re-export commonly used types
pub use config::Config;
pub use error::{AigitError, Result};
