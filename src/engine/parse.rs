use crate::error::GenerationError;
use crate::simulation::{
    Choice, ChoiceCategory, IntensityLevel, RevealMetadata, RevealResult, ScenarioDraft,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;

const DEFAULT_TITLE: &str = "Unknown Simulation";
const DEFAULT_ROLE: &str = "Participant";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawScenario {
    title: Option<String>,
    role: Option<String>,
    scene: Option<String>,
    micro_expressions: Option<String>,
    choices: Option<Vec<RawChoice>>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    id: f64,
    label: String,
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawReveal {
    outcome: String,
    analysis: String,
    log: RawLog,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLog {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    conflict_type: Option<String>,
    intensity_level: f64,
    core_skill: String,
    strategic_essence: String,
}

/// Models occasionally wrap JSON output in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn choice_id(raw: f64) -> Result<u32, GenerationError> {
    let rounded = raw.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return Err(GenerationError::scenario(format!("invalid choice id {raw}")));
    }
    Ok(rounded as u32)
}

fn convert_choices(raw: Vec<RawChoice>) -> Result<Vec<Choice>, GenerationError> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|choice| {
            let id = choice_id(choice.id)?;
            if !seen.insert(id) {
                return Err(GenerationError::scenario(format!("duplicate choice id {id}")));
            }
            let category = ChoiceCategory::from_str(choice.kind.trim()).map_err(|_| {
                GenerationError::scenario(format!("unknown choice type {:?}", choice.kind))
            })?;
            Ok(Choice {
                id,
                label: choice.label,
                category,
                text: choice.text,
            })
        })
        .collect()
}

/// Parse the scenario call's JSON text, substituting defaults for absent
/// fields.
pub fn parse_scenario(text: &str) -> Result<ScenarioDraft, GenerationError> {
    let raw: RawScenario = serde_json::from_str(strip_code_fence(text))
        .map_err(|err| GenerationError::scenario(format!("invalid simulation format: {err}")))?;

    Ok(ScenarioDraft {
        title: non_empty_or(raw.title, DEFAULT_TITLE),
        role: non_empty_or(raw.role, DEFAULT_ROLE),
        scene: raw.scene.unwrap_or_default(),
        micro_expression_notes: raw.micro_expressions.unwrap_or_default(),
        choices: convert_choices(raw.choices.unwrap_or_default())?,
    })
}

/// Parse the reveal call's JSON text. `language` and `conflictType` may be
/// missing; the archive applies defaults for them.
pub fn parse_reveal(text: &str) -> Result<RevealResult, GenerationError> {
    let raw: RawReveal = serde_json::from_str(strip_code_fence(text))
        .map_err(|err| GenerationError::reveal(format!("invalid reveal format: {err}")))?;

    Ok(RevealResult {
        outcome: raw.outcome,
        analysis: raw.analysis,
        metadata: RevealMetadata {
            language: raw.log.language.unwrap_or_default(),
            conflict_category: raw.log.conflict_type.unwrap_or_default(),
            intensity_level: IntensityLevel::clamped(raw.log.intensity_level),
            core_skill: raw.log.core_skill,
            strategic_essence: raw.log.strategic_essence,
        },
    })
}
