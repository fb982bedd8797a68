use crate::simulation::{Choice, SimulationRecord};
use tera::{Context, Tera};

/// Sent when the user starts a simulation without a prompt.
pub const DEFAULT_OPENING_PROMPT: &str = "Start a new high-stakes professional simulation.";

pub const SYSTEM_INSTRUCTION: &str = "\
You are a behavioural simulation engine. You stage short, high-stakes social \
scenarios and then dissect the psychology of how the user handled them.

LANGUAGE:
- Reply in the language of the user's input.
- Romanized Bengali input is answered in Bengali script.
- Structure and depth must not depend on the language.

SETUP PHASE:
- Define the user's role clearly.
- Describe the setting in 4-6 very short paragraphs.
- Give sharp, clinical micro-expression observations.
- Offer exactly 3 choices: one EMOTIONAL, one AVOIDANT, one STRATEGIC.

REVEAL PHASE:
- Outcome: 2-3 short paragraphs on the immediate consequence.
- Analysis: **SECTION TITLES IN CAPS**, every point a dash bullet followed by \
a blank line, key concepts in **bold**, never a long paragraph.

STYLE:
- At most 2 sentences per paragraph.
- A blank line between every point or paragraph.";

const REVEAL_TEMPLATE: &str = "\
Simulation: \"{{ title }}\"
Role: {{ role }}
The user chose: \"{{ label }}: {{ text }}\" ({{ category }})

Provide the outcome, the masterclass analysis and the simulation log.
Keep the analysis organised: bold section headers and a blank line between \
every point, in whatever language the scenario was written in.";

const REVEAL_NAME: &str = "reveal";

/// Renders the per-call prompts.
pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(REVEAL_NAME, REVEAL_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// User prompt for the scenario call; blank input gets the default opener.
    pub fn scenario_prompt(user_input: &str) -> &str {
        let trimmed = user_input.trim();
        if trimmed.is_empty() {
            DEFAULT_OPENING_PROMPT
        } else {
            trimmed
        }
    }

    pub fn reveal_prompt(&self, record: &SimulationRecord, choice: &Choice) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("title", &record.title);
        ctx.insert("role", &record.role);
        ctx.insert("label", &choice.label);
        ctx.insert("text", &choice.text);
        ctx.insert("category", &choice.category.to_string());
        Ok(self.tera.render(REVEAL_NAME, &ctx)?)
    }
}
