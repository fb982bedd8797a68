use super::parse::{parse_reveal, parse_scenario};
use super::traits::{GenerationFuture, SimulationEngine};
use crate::config::Config;
use crate::error::{GenerationError, GenerationPhase};
use crate::llm::{EmptyResponse, GeminiClient, StructuredRequest};
use crate::prompt::schema::{REVEAL_SCHEMA, SCENARIO_SCHEMA};
use crate::prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
use crate::simulation::{Choice, RevealResult, ScenarioDraft, SimulationRecord};

/// [`SimulationEngine`] backed by Gemini structured output.
pub struct GeminiEngine {
    client: GeminiClient,
    prompts: PromptBuilder,
    model: String,
    temperature: f64,
}

impl GeminiEngine {
    pub fn new(client: GeminiClient, model: &str, temperature: f64) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            prompts: PromptBuilder::new()?,
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key();
        let client = GeminiClient::with_base_url(
            api_key.as_deref(),
            Some(config.base_url.as_str()),
            config.request_timeout_secs,
        );
        if !client.has_api_key() {
            tracing::warn!("no Gemini API key configured; generation calls will fail");
        }
        Self::new(client, &config.model, config.temperature)
    }

    async fn scenario(&self, prompt: &str) -> Result<ScenarioDraft, GenerationError> {
        let request = StructuredRequest {
            model: &self.model,
            system_instruction: Some(SYSTEM_INSTRUCTION),
            prompt: PromptBuilder::scenario_prompt(prompt),
            response_schema: &SCENARIO_SCHEMA,
            temperature: self.temperature,
        };
        let text = match self.client.generate_json(&request).await {
            Ok(text) => text,
            // A scenario with no text still yields the default record.
            Err(err) if err.downcast_ref::<EmptyResponse>().is_some() => {
                tracing::debug!(error = %err, "empty scenario response; using defaults");
                "{}".to_string()
            }
            Err(err) => return Err(GenerationError::from_anyhow(GenerationPhase::Scenario, &err)),
        };
        parse_scenario(&text)
    }

    async fn reveal(
        &self,
        record: &SimulationRecord,
        choice: &Choice,
    ) -> Result<RevealResult, GenerationError> {
        let prompt = self
            .prompts
            .reveal_prompt(record, choice)
            .map_err(|err| GenerationError::from_anyhow(GenerationPhase::Reveal, &err))?;
        let request = StructuredRequest {
            model: &self.model,
            system_instruction: Some(SYSTEM_INSTRUCTION),
            prompt: &prompt,
            response_schema: &REVEAL_SCHEMA,
            temperature: self.temperature,
        };
        let text = self
            .client
            .generate_json(&request)
            .await
            .map_err(|err| GenerationError::from_anyhow(GenerationPhase::Reveal, &err))?;
        parse_reveal(&text)
    }
}

impl SimulationEngine for GeminiEngine {
    fn name(&self) -> &str {
        "gemini"
    }

    fn request_scenario<'a>(&'a self, prompt: &'a str) -> GenerationFuture<'a, ScenarioDraft> {
        Box::pin(self.scenario(prompt))
    }

    fn request_reveal<'a>(
        &'a self,
        record: &'a SimulationRecord,
        choice: &'a Choice,
    ) -> GenerationFuture<'a, RevealResult> {
        Box::pin(self.reveal(record, choice))
    }
}
