use super::machine::{Effect, Event, Notice, RequestId, SessionState, Transition, transition};
use crate::archive::Archive;
use crate::config::ProgressConfig;
use crate::engine::SimulationEngine;
use crate::progress::{ProgressMode, ProgressSimulator};
use crate::simulation::{RecordId, SimulationRecord};

/// Runs a session against an engine.
///
/// Owns the current state, the archive, and the progress indicator shown
/// while a generation call is in flight. Each async operation awaits at most
/// one engine call; failures become [`Notice`]s rather than errors.
pub struct SessionDriver<E> {
    engine: E,
    state: SessionState,
    archive: Archive,
    progress: ProgressSimulator,
    notices: Vec<Notice>,
    next_request: u64,
}

impl<E: SimulationEngine> SessionDriver<E> {
    pub fn new(engine: E, progress: &ProgressConfig) -> Self {
        Self::with_progress(engine, ProgressSimulator::new(progress))
    }

    pub fn with_progress(engine: E, progress: ProgressSimulator) -> Self {
        Self {
            engine,
            state: SessionState::Idle,
            archive: Archive::new(),
            progress,
            notices: Vec::new(),
            next_request: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_record(&self) -> Option<&SimulationRecord> {
        self.state.record()
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn progress(&self) -> &ProgressSimulator {
        &self.progress
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Generate a new scenario. Ignored unless the session is idle.
    pub async fn start_simulation(&mut self, prompt: &str) {
        let request_id = self.allocate_request();
        let event = Event::StartSimulation {
            prompt: prompt.to_string(),
            request_id,
        };
        self.run(event).await;
    }

    /// Reveal the consequences of `choice_id`. Ignored unless setup is ready
    /// and the choice exists.
    pub async fn select_choice(&mut self, choice_id: u32) {
        let request_id = self.allocate_request();
        self.run(Event::SelectChoice {
            choice_id,
            request_id,
        })
        .await;
    }

    pub fn undo(&mut self) {
        self.run_local(Event::Undo);
    }

    /// Return to idle. The archive is kept.
    pub fn reset(&mut self) {
        if self.state.is_awaiting() {
            self.progress.cancel();
        }
        self.run_local(Event::Reset);
    }

    /// Show an archived record. Returns `false` if `id` is not archived.
    pub fn load_from_archive(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.archive.find_record(id).cloned() else {
            tracing::debug!(record = %id, "archive lookup missed");
            return false;
        };
        if self.state.is_awaiting() {
            self.progress.cancel();
        }
        self.run_local(Event::LoadFromArchive { record });
        true
    }

    fn allocate_request(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Apply one event and execute its effects until no request remains.
    async fn run(&mut self, event: Event) {
        let mut pending = self.apply(event);
        while let Some(effect) = pending.pop() {
            let next = match effect {
                Effect::RequestScenario { request_id, prompt } => {
                    self.progress.start(ProgressMode::Plain);
                    let result = self.engine.request_scenario(&prompt).await;
                    self.finish_progress(result.is_ok());
                    Event::ScenarioResolved { request_id, result }
                }
                Effect::RequestReveal {
                    request_id,
                    record,
                    choice,
                } => {
                    self.progress.start(ProgressMode::Phrases);
                    let result = self.engine.request_reveal(&record, &choice).await;
                    self.finish_progress(result.is_ok());
                    Event::RevealResolved { request_id, result }
                }
                Effect::Archive(_) | Effect::Notify(_) => continue,
            };
            pending.extend(self.apply(next));
        }
    }

    fn run_local(&mut self, event: Event) {
        let pending = self.apply(event);
        debug_assert!(pending.is_empty(), "local events never request generation");
    }

    /// Swap in the next state and execute local effects. Returns the
    /// generation requests that still have to be made.
    fn apply(&mut self, event: Event) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let Transition { state, effects } = transition(state, event);
        self.state = state;

        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::Archive(record) => self.commit(&record),
                Effect::Notify(notice) => self.notices.push(notice),
                request => requests.push(request),
            }
        }
        requests
    }

    fn commit(&mut self, record: &SimulationRecord) {
        match self.archive.record_reveal(record) {
            Ok(archive) => self.archive = archive,
            Err(err) => tracing::warn!("archive rejected record: {err}"),
        }
    }

    fn finish_progress(&mut self, succeeded: bool) {
        if succeeded {
            self.progress.complete();
        } else {
            self.progress.cancel();
        }
    }
}
