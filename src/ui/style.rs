use crate::simulation::ChoiceCategory;
use console::style;
use std::fmt::Display;

/// White bold: titles, section headers
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Bold without colour: emphasised spans inside analysis text
pub fn strong<D: Display>(text: D) -> String {
    style(text).bold().to_string()
}

/// Dim: secondary text, rules, hints
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Cyan bold: markers and field labels
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Green: configured values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Yellow: notices and warnings
pub fn warn<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Category tag of a choice, coloured by category.
pub fn category_tag(category: ChoiceCategory) -> String {
    let tag = style(format!("[{category}]"));
    match category {
        ChoiceCategory::Emotional => tag.red(),
        ChoiceCategory::Avoidant => tag.magenta(),
        ChoiceCategory::Strategic => tag.blue(),
    }
    .to_string()
}
