use super::presets::PRESETS;
use super::view;
use crate::config::Config;
use crate::engine::{GeminiEngine, SimulationEngine};
use crate::progress::{COMPLETE, ProgressSnapshot};
use crate::session::{SessionDriver, SessionState};
use crate::simulation::RecordId;
use crate::ui::style as ui;
use anyhow::Result;
use console::Term;
use dialoguer::{Input, Select};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Upper bound on waiting for the view to draw its final frame.
const FINAL_FRAME_WAIT: Duration = Duration::from_millis(250);

/// What the user picked from a menu.
enum Action {
    Start(String),
    Choose(u32),
    Load(RecordId),
    Undo,
    NewSimulation,
    Quit,
}

pub async fn run(config: &Config, opening: Option<String>) -> Result<()> {
    let engine = GeminiEngine::from_config(config)?;
    let mut session = SessionDriver::new(engine, &config.progress);
    let settle = Duration::from_millis(config.progress.settle_ms);
    tracing::info!(engine = session.engine().name(), model = %config.model, "session started");

    view::print_banner();
    let mut queued = opening.map(Action::Start);

    loop {
        let action = match queued.take() {
            Some(action) => action,
            None => next_action(&session)?,
        };

        match action {
            Action::Start(prompt) => {
                let ticker =
                    spawn_progress_view(session.progress().subscribe(), "Staging scenario");
                session.start_simulation(&prompt).await;
                stop_progress_view(ticker, settle).await;
            }
            Action::Choose(choice_id) => {
                let ticker = spawn_progress_view(session.progress().subscribe(), "Revealing");
                session.select_choice(choice_id).await;
                stop_progress_view(ticker, settle).await;
            }
            Action::Load(id) => {
                session.load_from_archive(&id);
            }
            Action::Undo => session.undo(),
            Action::NewSimulation => session.reset(),
            Action::Quit => break,
        }

        view::print_notices(&session.take_notices());
        match session.state() {
            SessionState::SetupReady { record } => view::print_scenario(record),
            SessionState::Revealed { record } => view::print_reveal(record),
            _ => {}
        }
    }

    println!(
        "  {}",
        ui::dim(format!(
            "{} record(s) archived this session.",
            session.archive().len()
        ))
    );
    Ok(())
}

fn next_action<E: SimulationEngine>(session: &SessionDriver<E>) -> Result<Action> {
    let archive_available = !session.archive().is_empty();
    match session.state() {
        SessionState::SetupReady { record } => {
            let mut items: Vec<String> = record
                .choices
                .iter()
                .map(|choice| format!("{}. {}", choice.id, choice.label))
                .collect();
            let choice_count = items.len();
            let extras = menu_extras(archive_available);
            items.extend(extras.iter().map(|(label, _)| (*label).to_string()));

            let picked = select("Your move", &items)?;
            if picked < choice_count {
                return Ok(Action::Choose(record.choices[picked].id));
            }
            extra_action(session, extras[picked - choice_count].1)
        }
        SessionState::Revealed { .. } => {
            let mut extras = vec![("Undo: choose differently", Extra::Undo)];
            extras.extend(menu_extras(archive_available));
            let items: Vec<&str> = extras.iter().map(|(label, _)| *label).collect();
            let picked = select("Next", &items)?;
            extra_action(session, extras[picked].1)
        }
        _ => opening_action(session, archive_available),
    }
}

#[derive(Clone, Copy)]
enum Extra {
    Undo,
    NewSimulation,
    Archive,
    Quit,
}

fn menu_extras(archive_available: bool) -> Vec<(&'static str, Extra)> {
    let mut extras = vec![("New simulation", Extra::NewSimulation)];
    if archive_available {
        extras.push(("Browse archive", Extra::Archive));
    }
    extras.push(("Quit", Extra::Quit));
    extras
}

fn extra_action<E: SimulationEngine>(session: &SessionDriver<E>, extra: Extra) -> Result<Action> {
    Ok(match extra {
        Extra::Undo => Action::Undo,
        Extra::NewSimulation => Action::NewSimulation,
        Extra::Quit => Action::Quit,
        Extra::Archive => match browse_archive(session)? {
            Some(id) => Action::Load(id),
            None => next_action(session)?,
        },
    })
}

fn opening_action<E: SimulationEngine>(
    session: &SessionDriver<E>,
    archive_available: bool,
) -> Result<Action> {
    let mut items: Vec<String> = vec!["Describe your own scenario".to_string()];
    items.extend(
        PRESETS
            .iter()
            .map(|preset| format!("{}: {}", preset.title, preset.prompt)),
    );
    if archive_available {
        items.push("Browse archive".to_string());
    }
    items.push("Quit".to_string());

    let picked = select("Start", &items)?;
    if picked == 0 {
        let prompt: String = Input::new()
            .with_prompt("  Scenario (leave blank for a surprise)")
            .allow_empty(true)
            .interact_text()?;
        return Ok(Action::Start(prompt));
    }
    if let Some(preset) = PRESETS.get(picked - 1) {
        return Ok(Action::Start(preset.prompt.to_string()));
    }
    if archive_available && picked == PRESETS.len() + 1 {
        return Ok(match browse_archive(session)? {
            Some(id) => Action::Load(id),
            None => opening_action(session, archive_available)?,
        });
    }
    Ok(Action::Quit)
}

fn browse_archive<E: SimulationEngine>(session: &SessionDriver<E>) -> Result<Option<RecordId>> {
    let mut entries = view::archive_entries(session.archive());
    let mut items: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
    items.push("Back".to_string());

    let picked = select("Archive", &items)?;
    if picked < entries.len() {
        Ok(Some(entries.swap_remove(picked).1))
    } else {
        Ok(None)
    }
}

fn select<T: std::fmt::Display>(prompt: &str, items: &[T]) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(format!("  {prompt}"))
        .items(items)
        .default(0)
        .interact()?)
}

/// Redraw the progress line on every snapshot until progress stops.
fn spawn_progress_view(
    rx: watch::Receiver<ProgressSnapshot>,
    label: &'static str,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let term = Term::stdout();
        follow_progress(rx, |snapshot| {
            let _ = term.clear_line();
            let _ = term.write_str(&view::progress_line(label, snapshot));
        })
        .await
    })
}

/// Hand each snapshot to `draw`, up to and including the first stopped one.
/// Returns whether progress stopped at completion.
async fn follow_progress(
    mut rx: watch::Receiver<ProgressSnapshot>,
    mut draw: impl FnMut(&ProgressSnapshot),
) -> bool {
    while rx.changed().await.is_ok() {
        let snapshot = *rx.borrow_and_update();
        draw(&snapshot);
        if !snapshot.running {
            return snapshot.percent >= COMPLETE;
        }
    }
    false
}

/// Wait for the final frame, keep a completed bar up for `settle`, then clear.
async fn stop_progress_view(mut ticker: JoinHandle<bool>, settle: Duration) {
    let completed = matches!(
        tokio::time::timeout(FINAL_FRAME_WAIT, &mut ticker).await,
        Ok(Ok(true))
    );
    if completed {
        tokio::time::sleep(settle).await;
    }
    ticker.abort();
    let _ = Term::stdout().clear_line();
}
