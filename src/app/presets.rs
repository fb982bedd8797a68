/// Built-in quick-start scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Identifier accepted by `play --preset`.
    pub slug: &'static str,
    pub title: &'static str,
    pub prompt: &'static str,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        slug: "capital-negotiation",
        title: "Capital Negotiation",
        prompt: "Negotiating with a high-stakes investor",
    },
    Preset {
        slug: "status-power-play",
        title: "Status Power Play",
        prompt: "Navigating a power play in a team setting",
    },
    Preset {
        slug: "crisis-comms",
        title: "Crisis Comms",
        prompt: "Public apology after a major strategic failure",
    },
];

/// Look up a preset by slug or title, ignoring case.
pub fn find(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|p| p.slug.eq_ignore_ascii_case(name) || p.title.eq_ignore_ascii_case(name))
}

pub fn render_list() -> String {
    let mut out = String::new();
    for preset in &PRESETS {
        out.push_str(&format!(
            "  {:<22} {:<20} {}\n",
            preset.slug, preset.title, preset.prompt
        ));
    }
    out
}
