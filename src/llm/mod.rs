// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod scrub;

// ── Provider implementations ────────────────────────────────────────────────
pub mod gemini;

pub use gemini::{EmptyResponse, GeminiClient, StructuredRequest};
pub use http_client::build_provider_client_with_timeout;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
