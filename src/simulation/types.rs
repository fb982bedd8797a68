use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString, VariantArray};

/// Language assumed when the generator omits one.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Opaque per-session identifier of a simulation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behavioural stance a choice represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, VariantArray,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ChoiceCategory {
    Emotional,
    Avoidant,
    Strategic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: u32,
    pub label: String,
    pub category: ChoiceCategory,
    pub text: String,
}

/// Conflict types advertised to the generator.
///
/// Stored metadata keeps the generator's raw string, so values outside this
/// list are still archived under their own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantArray)]
#[strum(ascii_case_insensitive)]
pub enum ConflictType {
    Social,
    Professional,
    #[strum(serialize = "Power Dynamics")]
    PowerDynamics,
    Leadership,
    Negotiation,
}

/// Core skills advertised to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantArray)]
#[strum(ascii_case_insensitive)]
pub enum CoreSkill {
    #[strum(serialize = "Emotional Control")]
    EmotionalControl,
    Assertiveness,
    #[strum(serialize = "Social Intelligence")]
    SocialIntelligence,
    #[strum(serialize = "Boundary Setting")]
    BoundarySetting,
    Persuasion,
    #[strum(serialize = "Status Management")]
    StatusManagement,
}

/// Intensity of a revealed scenario, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Round and clamp a raw generator number into range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(Self::MIN);
        }
        let rounded = raw
            .round()
            .clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Self(rounded as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMetadata {
    /// May be empty when the generator omitted it; see [`RevealMetadata::language_or_default`].
    pub language: String,
    /// May be empty when the generator omitted it.
    pub conflict_category: String,
    pub intensity_level: IntensityLevel,
    pub core_skill: String,
    pub strategic_essence: String,
}

impl RevealMetadata {
    pub fn language_or_default(&self) -> &str {
        non_blank(&self.language).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn conflict_category_or_default(&self) -> String {
        non_blank(&self.conflict_category)
            .map_or_else(|| ConflictType::Social.to_string(), str::to_string)
    }
}

// Only the empty string falls back; other values are kept verbatim.
fn non_blank(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Setup-phase content returned by the scenario call, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDraft {
    pub title: String,
    pub role: String,
    pub scene: String,
    pub micro_expression_notes: String,
    pub choices: Vec<Choice>,
}

/// Phase-two content returned by the reveal call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealResult {
    pub outcome: String,
    pub analysis: String,
    pub metadata: RevealMetadata,
}

/// Everything a record gains at reveal time. Held as one optional value so
/// the revealed fields are all present or all absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub selected_choice_id: u32,
    pub outcome: String,
    pub analysis: String,
    pub metadata: RevealMetadata,
    pub revealed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: RecordId,
    pub title: String,
    pub role: String,
    pub scene: String,
    pub micro_expression_notes: String,
    pub choices: Vec<Choice>,
    pub created_at: DateTime<Utc>,
    reveal: Option<Reveal>,
}

impl SimulationRecord {
    /// Build a setup-phase record with a freshly generated id.
    pub fn from_draft(draft: ScenarioDraft) -> Self {
        Self::with_id(RecordId::generate(), draft)
    }

    pub fn with_id(id: RecordId, draft: ScenarioDraft) -> Self {
        Self {
            id,
            title: draft.title,
            role: draft.role,
            scene: draft.scene,
            micro_expression_notes: draft.micro_expression_notes,
            choices: draft.choices,
            created_at: Utc::now(),
            reveal: None,
        }
    }

    pub fn choice(&self, choice_id: u32) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal.is_some()
    }

    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref()
    }

    pub fn selected_choice_id(&self) -> Option<u32> {
        self.reveal.as_ref().map(|r| r.selected_choice_id)
    }

    pub fn selected_choice(&self) -> Option<&Choice> {
        self.selected_choice_id().and_then(|id| self.choice(id))
    }

    pub fn outcome(&self) -> Option<&str> {
        self.reveal.as_ref().map(|r| r.outcome.as_str())
    }

    pub fn analysis(&self) -> Option<&str> {
        self.reveal.as_ref().map(|r| r.analysis.as_str())
    }

    pub fn metadata(&self) -> Option<&RevealMetadata> {
        self.reveal.as_ref().map(|r| &r.metadata)
    }

    /// New value carrying the same id, with the reveal merged in.
    pub fn revealed(&self, selected_choice_id: u32, result: RevealResult) -> Self {
        Self {
            reveal: Some(Reveal {
                selected_choice_id,
                outcome: result.outcome,
                analysis: result.analysis,
                metadata: result.metadata,
                revealed_at: Utc::now(),
            }),
            ..self.clone()
        }
    }

    /// New value carrying the same id, back in setup phase.
    pub fn stripped(&self) -> Self {
        Self {
            reveal: None,
            ..self.clone()
        }
    }
}
