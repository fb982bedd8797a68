//! Prompt text and response schemas sent to the generator.

mod builder;
pub mod schema;

pub use builder::{DEFAULT_OPENING_PROMPT, PromptBuilder, SYSTEM_INSTRUCTION};
