use crate::archive::Archive;
use crate::progress::ProgressSnapshot;
use crate::session::Notice;
use crate::simulation::{RecordId, SimulationRecord};
use crate::ui::style as ui;

const BAR_WIDTH: usize = 30;

pub fn print_banner() {
    println!();
    println!("  {}", ui::header("◆ psychsim"));
    println!(
        "  {}",
        ui::dim("High-stakes scenarios. One move. A clinical debrief.")
    );
    println!();
}

fn print_rule() {
    println!("  {}", ui::dim("─".repeat(50)));
}

fn print_block(text: &str) {
    for line in text.lines() {
        if line.trim().is_empty() {
            println!();
        } else {
            println!("  {}", render_emphasis(line));
        }
    }
}

pub fn print_scenario(record: &SimulationRecord) {
    println!();
    println!("  {}", ui::header(&record.title));
    println!("  {} {}", ui::accent("Role:"), record.role);
    print_rule();
    print_block(&record.scene);
    if !record.micro_expression_notes.trim().is_empty() {
        println!();
        println!("  {}", ui::accent("Micro-expressions"));
        print_block(&record.micro_expression_notes);
    }
    println!();
    for choice in &record.choices {
        println!(
            "  {} {} {}",
            ui::accent(format!("{}.", choice.id)),
            ui::header(&choice.label),
            ui::category_tag(choice.category)
        );
        println!("     {}", choice.text);
    }
    println!();
}

pub fn print_reveal(record: &SimulationRecord) {
    let (Some(choice), Some(outcome), Some(analysis), Some(metadata)) = (
        record.selected_choice(),
        record.outcome(),
        record.analysis(),
        record.metadata(),
    ) else {
        return;
    };

    println!();
    println!("  {}", ui::header(&record.title));
    println!(
        "  {} {} {}",
        ui::accent("You chose:"),
        choice.label,
        ui::category_tag(choice.category)
    );
    print_rule();
    println!("  {}", ui::accent("Outcome"));
    print_block(outcome);
    println!();
    println!("  {}", ui::accent("Analysis"));
    print_block(analysis);
    println!();
    print_rule();
    println!(
        "  {} {}  {} {}  {} {}/5",
        ui::dim("Conflict"),
        ui::value(metadata.conflict_category_or_default()),
        ui::dim("Skill"),
        ui::value(&metadata.core_skill),
        ui::dim("Intensity"),
        ui::value(metadata.intensity_level.get()),
    );
    println!(
        "  {} {}",
        ui::dim("Essence"),
        render_emphasis(&metadata.strategic_essence)
    );
    println!();
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("  {} {}", ui::warn("!"), ui::warn(notice));
    }
}

/// Split `text` on `**` markers into `(emphasised, span)` pairs. An
/// unmatched trailing marker emphasises the rest of the line.
pub fn emphasis_spans(text: &str) -> Vec<(bool, &str)> {
    text.split("**")
        .enumerate()
        .filter(|(_, span)| !span.is_empty())
        .map(|(index, span)| (index % 2 == 1, span))
        .collect()
}

pub fn render_emphasis(text: &str) -> String {
    emphasis_spans(text)
        .into_iter()
        .map(|(strong, span)| {
            if strong {
                ui::strong(span)
            } else {
                span.to_string()
            }
        })
        .collect()
}

/// One-line rendering of a progress snapshot. The phrase, when present,
/// replaces `label`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_line(label: &str, snapshot: &ProgressSnapshot) -> String {
    let percent = snapshot.percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    let label = snapshot.phrase.unwrap_or(label);
    format!("  {label:<28} {bar} {percent:>3.0}%")
}

/// Menu entries for every archived record, grouped in category order.
pub fn archive_entries(archive: &Archive) -> Vec<(String, RecordId)> {
    archive
        .list_categories()
        .iter()
        .flat_map(|category| {
            category.records().iter().map(move |record| {
                (
                    format!("{} · {}", category.key(), record.title),
                    record.id.clone(),
                )
            })
        })
        .collect()
}
