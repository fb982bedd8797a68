use crate::error::GenerationError;
use crate::simulation::{Choice, RevealResult, ScenarioDraft, SimulationRecord};
use std::future::Future;
use std::pin::Pin;

pub type GenerationFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, GenerationError>> + Send + 'a>>;

pub trait SimulationEngine: Send + Sync {
    /// Engine identifier for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a setup-phase scenario. A blank prompt asks for an open one.
    fn request_scenario<'a>(&'a self, prompt: &'a str) -> GenerationFuture<'a, ScenarioDraft>;

    /// Generate the outcome, analysis and metadata for `choice`.
    fn request_reveal<'a>(
        &'a self,
        record: &'a SimulationRecord,
        choice: &'a Choice,
    ) -> GenerationFuture<'a, RevealResult>;
}
