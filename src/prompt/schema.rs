//! Gemini `responseSchema` documents for the two generation calls.

use crate::simulation::{ChoiceCategory, ConflictType, CoreSkill};
use serde_json::{Value, json};
use std::sync::LazyLock;
use strum::VariantArray;

fn names<T: ToString>(variants: &[T]) -> Vec<String> {
    variants.iter().map(ToString::to_string).collect()
}

pub static SCENARIO_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "role": {"type": "STRING"},
            "scene": {"type": "STRING"},
            "microExpressions": {"type": "STRING"},
            "choices": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {"type": "NUMBER"},
                        "label": {"type": "STRING"},
                        "type": {"type": "STRING", "enum": names(ChoiceCategory::VARIANTS)},
                        "text": {"type": "STRING"}
                    },
                    "required": ["id", "label", "type", "text"]
                }
            }
        },
        "required": ["title", "role", "scene", "microExpressions", "choices"]
    })
});

pub static REVEAL_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "outcome": {"type": "STRING"},
            "analysis": {"type": "STRING"},
            "log": {
                "type": "OBJECT",
                "properties": {
                    "language": {"type": "STRING"},
                    "conflictType": {"type": "STRING", "enum": names(ConflictType::VARIANTS)},
                    "intensityLevel": {"type": "NUMBER"},
                    "coreSkill": {"type": "STRING", "enum": names(CoreSkill::VARIANTS)},
                    "strategicEssence": {"type": "STRING"}
                },
                "required": [
                    "language",
                    "conflictType",
                    "intensityLevel",
                    "coreSkill",
                    "strategicEssence"
                ]
            }
        },
        "required": ["outcome", "analysis", "log"]
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_schema_lists_choice_categories() {
        let kinds = &SCENARIO_SCHEMA["properties"]["choices"]["items"]["properties"]["type"]["enum"];
        assert_eq!(kinds, &json!(["EMOTIONAL", "AVOIDANT", "STRATEGIC"]));
    }

    #[test]
    fn reveal_schema_lists_conflict_types() {
        let conflicts = &REVEAL_SCHEMA["properties"]["log"]["properties"]["conflictType"]["enum"];
        assert_eq!(conflicts.as_array().unwrap().len(), 5);
        assert!(conflicts.as_array().unwrap().contains(&json!("Power Dynamics")));
    }

    #[test]
    fn reveal_schema_requires_top_level_fields() {
        assert_eq!(
            REVEAL_SCHEMA["required"],
            json!(["outcome", "analysis", "log"])
        );
    }
}
