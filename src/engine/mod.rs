//! The two generation calls the session depends on, behind one trait so the
//! session can run against Gemini or a scripted double.

mod gemini;
mod parse;
mod traits;

pub use gemini::GeminiEngine;
pub use parse::{parse_reveal, parse_scenario};
pub use traits::{GenerationFuture, SimulationEngine};
