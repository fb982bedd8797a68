//! Domain model of a behavioural simulation: records, choices and the
//! reveal metadata used for archiving.

mod types;

pub use types::{
    Choice, ChoiceCategory, ConflictType, CoreSkill, DEFAULT_LANGUAGE, IntensityLevel, RecordId,
    Reveal, RevealMetadata, RevealResult, ScenarioDraft, SimulationRecord,
};
