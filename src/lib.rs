#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod progress;
pub mod prompt;
pub mod session;
pub mod simulation;
pub mod ui;

pub use config::Config;
pub use engine::{GeminiEngine, SimulationEngine};
pub use session::SessionDriver;
