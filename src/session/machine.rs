use crate::error::GenerationError;
use crate::simulation::{Choice, RevealResult, ScenarioDraft, SimulationRecord};
use std::fmt;

/// Correlates an outstanding generation call with its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingSetup {
        request_id: RequestId,
        prompt: String,
    },
    /// The record has no selection yet.
    SetupReady { record: SimulationRecord },
    AwaitingReveal {
        record: SimulationRecord,
        choice_id: u32,
        request_id: RequestId,
    },
    /// The record is fully revealed.
    Revealed { record: SimulationRecord },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingSetup { .. } => "awaiting_setup",
            Self::SetupReady { .. } => "setup_ready",
            Self::AwaitingReveal { .. } => "awaiting_reveal",
            Self::Revealed { .. } => "revealed",
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(
            self,
            Self::AwaitingSetup { .. } | Self::AwaitingReveal { .. }
        )
    }

    pub fn record(&self) -> Option<&SimulationRecord> {
        match self {
            Self::Idle | Self::AwaitingSetup { .. } => None,
            Self::SetupReady { record }
            | Self::AwaitingReveal { record, .. }
            | Self::Revealed { record } => Some(record),
        }
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            Self::AwaitingSetup { request_id, .. } | Self::AwaitingReveal { request_id, .. } => {
                Some(*request_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    StartSimulation {
        prompt: String,
        request_id: RequestId,
    },
    ScenarioResolved {
        request_id: RequestId,
        result: Result<ScenarioDraft, GenerationError>,
    },
    SelectChoice {
        choice_id: u32,
        request_id: RequestId,
    },
    RevealResolved {
        request_id: RequestId,
        result: Result<RevealResult, GenerationError>,
    },
    Undo,
    Reset,
    LoadFromArchive { record: SimulationRecord },
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::StartSimulation { .. } => "start_simulation",
            Self::ScenarioResolved { .. } => "scenario_resolved",
            Self::SelectChoice { .. } => "select_choice",
            Self::RevealResolved { .. } => "reveal_resolved",
            Self::Undo => "undo",
            Self::Reset => "reset",
            Self::LoadFromArchive { .. } => "load_from_archive",
        }
    }
}

/// User-facing message produced by a failed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ScenarioFailed,
    RevealFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::ScenarioFailed => "The engine encountered a friction point. Please retry.",
            Self::RevealFailed => "The reveal phase encountered an error.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestScenario {
        request_id: RequestId,
        prompt: String,
    },
    RequestReveal {
        request_id: RequestId,
        record: SimulationRecord,
        choice: Choice,
    },
    /// Insert a freshly revealed record into the archive.
    Archive(SimulationRecord),
    Notify(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

/// Advance the session by one event.
///
/// Events that do not apply to the current state leave it unchanged and
/// produce no effects. That covers start and select while a call is in
/// flight, and resolutions whose request id is not the one being awaited.
pub fn transition(state: SessionState, event: Event) -> Transition {
    match (state, event) {
        (_, Event::Reset) => {
            tracing::info!("session reset");
            Transition::to(SessionState::Idle)
        }

        (state, Event::LoadFromArchive { record }) => {
            if record.is_revealed() {
                tracing::info!(record = %record.id, "loaded record from archive");
                Transition::to(SessionState::Revealed { record })
            } else {
                tracing::debug!(record = %record.id, "ignoring load of unrevealed record");
                Transition::to(state)
            }
        }

        (SessionState::Idle, Event::StartSimulation { prompt, request_id }) => {
            tracing::debug!(request = %request_id, "requesting scenario");
            Transition::with(
                SessionState::AwaitingSetup {
                    request_id,
                    prompt: prompt.clone(),
                },
                Effect::RequestScenario { request_id, prompt },
            )
        }

        (
            SessionState::AwaitingSetup {
                request_id: awaited,
                prompt,
            },
            Event::ScenarioResolved { request_id, result },
        ) if awaited == request_id => match result {
            Ok(draft) => {
                let record = SimulationRecord::from_draft(draft);
                tracing::info!(
                    record = %record.id,
                    choices = record.choices.len(),
                    "scenario ready"
                );
                Transition::to(SessionState::SetupReady { record })
            }
            Err(err) => {
                tracing::warn!(prompt = %prompt, "scenario request failed: {err}");
                Transition::with(SessionState::Idle, Effect::Notify(Notice::ScenarioFailed))
            }
        },

        (SessionState::SetupReady { record }, Event::SelectChoice { choice_id, request_id }) => {
            let Some(choice) = record.choice(choice_id).cloned() else {
                tracing::debug!(record = %record.id, choice_id, "ignoring unknown choice");
                return Transition::to(SessionState::SetupReady { record });
            };
            tracing::debug!(request = %request_id, choice_id, "requesting reveal");
            Transition::with(
                SessionState::AwaitingReveal {
                    record: record.clone(),
                    choice_id,
                    request_id,
                },
                Effect::RequestReveal {
                    request_id,
                    record,
                    choice,
                },
            )
        }

        (
            SessionState::AwaitingReveal {
                record,
                choice_id,
                request_id: awaited,
            },
            Event::RevealResolved { request_id, result },
        ) if awaited == request_id => match result {
            Ok(reveal) => {
                let revealed = record.revealed(choice_id, reveal);
                tracing::info!(record = %revealed.id, choice_id, "reveal complete");
                Transition::with(
                    SessionState::Revealed {
                        record: revealed.clone(),
                    },
                    Effect::Archive(revealed),
                )
            }
            Err(err) => {
                tracing::warn!(record = %record.id, choice_id, "reveal request failed: {err}");
                Transition::with(
                    SessionState::SetupReady { record },
                    Effect::Notify(Notice::RevealFailed),
                )
            }
        },

        (SessionState::Revealed { record }, Event::Undo) => {
            tracing::info!(record = %record.id, "undo reveal");
            Transition::to(SessionState::SetupReady {
                record: record.stripped(),
            })
        }

        (state, event) => {
            tracing::debug!(
                state = state.name(),
                event = event.name(),
                "event ignored in current state"
            );
            Transition::to(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::fixtures::{draft, reveal, revealed_record};

    fn setup_ready() -> SessionState {
        SessionState::SetupReady {
            record: SimulationRecord::from_draft(draft("Boardroom", 3)),
        }
    }

    fn awaiting_reveal(request_id: u64) -> SessionState {
        let Transition { state, .. } = transition(
            setup_ready(),
            Event::SelectChoice {
                choice_id: 2,
                request_id: RequestId(request_id),
            },
        );
        state
    }

    #[test]
    fn start_from_idle_requests_scenario() {
        let t = transition(
            SessionState::Idle,
            Event::StartSimulation {
                prompt: "negotiation".into(),
                request_id: RequestId(1),
            },
        );

        assert!(matches!(
            t.state,
            SessionState::AwaitingSetup { request_id: RequestId(1), .. }
        ));
        assert_eq!(
            t.effects,
            vec![Effect::RequestScenario {
                request_id: RequestId(1),
                prompt: "negotiation".into()
            }]
        );
    }

    #[test]
    fn start_is_ignored_outside_idle() {
        let state = setup_ready();
        let t = transition(
            state.clone(),
            Event::StartSimulation {
                prompt: String::new(),
                request_id: RequestId(9),
            },
        );
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn scenario_success_creates_fresh_record() {
        let awaiting = SessionState::AwaitingSetup {
            request_id: RequestId(1),
            prompt: String::new(),
        };
        let t = transition(
            awaiting,
            Event::ScenarioResolved {
                request_id: RequestId(1),
                result: Ok(draft("Fresh", 3)),
            },
        );

        let record = t.state.record().unwrap();
        assert_eq!(t.state.name(), "setup_ready");
        assert_eq!(record.title, "Fresh");
        assert!(!record.is_revealed());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn scenario_failure_returns_to_idle_with_notice() {
        let awaiting = SessionState::AwaitingSetup {
            request_id: RequestId(1),
            prompt: String::new(),
        };
        let t = transition(
            awaiting,
            Event::ScenarioResolved {
                request_id: RequestId(1),
                result: Err(GenerationError::scenario("timeout")),
            },
        );

        assert_eq!(t.state, SessionState::Idle);
        assert_eq!(t.effects, vec![Effect::Notify(Notice::ScenarioFailed)]);
    }

    #[test]
    fn stale_scenario_resolution_is_ignored() {
        let awaiting = SessionState::AwaitingSetup {
            request_id: RequestId(2),
            prompt: String::new(),
        };
        let t = transition(
            awaiting.clone(),
            Event::ScenarioResolved {
                request_id: RequestId(1),
                result: Ok(draft("Late", 3)),
            },
        );
        assert_eq!(t.state, awaiting);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn select_unknown_choice_is_ignored() {
        let state = setup_ready();
        let t = transition(
            state.clone(),
            Event::SelectChoice {
                choice_id: 42,
                request_id: RequestId(1),
            },
        );
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn select_requests_reveal_for_that_choice() {
        let record = SimulationRecord::from_draft(draft("Boardroom", 3));
        let t = transition(
            SessionState::SetupReady {
                record: record.clone(),
            },
            Event::SelectChoice {
                choice_id: 2,
                request_id: RequestId(5),
            },
        );

        assert_eq!(t.state.pending_request(), Some(RequestId(5)));
        match t.effects.as_slice() {
            [Effect::RequestReveal { choice, record: sent, .. }] => {
                assert_eq!(choice.id, 2);
                assert_eq!(sent.id, record.id);
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn select_while_awaiting_reveal_is_a_no_op() {
        let state = awaiting_reveal(1);
        let t = transition(
            state.clone(),
            Event::SelectChoice {
                choice_id: 1,
                request_id: RequestId(2),
            },
        );
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn reveal_success_archives_revealed_record() {
        let state = awaiting_reveal(1);
        let id = state.record().unwrap().id.clone();
        let t = transition(
            state,
            Event::RevealResolved {
                request_id: RequestId(1),
                result: Ok(reveal("English", "Negotiation")),
            },
        );

        let record = t.state.record().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.selected_choice_id(), Some(2));
        assert_eq!(t.effects, vec![Effect::Archive(record.clone())]);
    }

    #[test]
    fn reveal_failure_restores_pre_reveal_record() {
        let state = awaiting_reveal(1);
        let before = state.record().unwrap().clone();
        let t = transition(
            state,
            Event::RevealResolved {
                request_id: RequestId(1),
                result: Err(GenerationError::reveal("bad json")),
            },
        );

        assert_eq!(t.state, SessionState::SetupReady { record: before });
        assert_eq!(t.effects, vec![Effect::Notify(Notice::RevealFailed)]);
    }

    #[test]
    fn undo_strips_reveal_and_keeps_id() {
        let record = revealed_record("Pitch", "English", "Negotiation");
        let t = transition(
            SessionState::Revealed {
                record: record.clone(),
            },
            Event::Undo,
        );

        let stripped = t.state.record().unwrap();
        assert_eq!(t.state.name(), "setup_ready");
        assert_eq!(stripped.id, record.id);
        assert!(!stripped.is_revealed());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn undo_outside_revealed_is_ignored() {
        let state = setup_ready();
        assert_eq!(transition(state.clone(), Event::Undo).state, state);
    }

    #[test]
    fn reset_abandons_in_flight_reveal() {
        let t = transition(awaiting_reveal(3), Event::Reset);
        assert_eq!(t.state, SessionState::Idle);

        let late = transition(
            t.state,
            Event::RevealResolved {
                request_id: RequestId(3),
                result: Ok(reveal("English", "Social")),
            },
        );
        assert_eq!(late.state, SessionState::Idle);
        assert!(late.effects.is_empty());
    }

    #[test]
    fn load_from_archive_jumps_to_revealed_from_any_state() {
        let record = revealed_record("Archived", "English", "Social");
        for state in [SessionState::Idle, setup_ready(), awaiting_reveal(1)] {
            let t = transition(
                state,
                Event::LoadFromArchive {
                    record: record.clone(),
                },
            );
            assert_eq!(
                t.state,
                SessionState::Revealed {
                    record: record.clone()
                }
            );
        }
    }

    #[test]
    fn load_of_unrevealed_record_is_ignored() {
        let record = SimulationRecord::from_draft(draft("Setup only", 3));
        let t = transition(SessionState::Idle, Event::LoadFromArchive { record });
        assert_eq!(t.state, SessionState::Idle);
    }

    #[test]
    fn notices_carry_user_text() {
        assert_eq!(
            Notice::ScenarioFailed.to_string(),
            "The engine encountered a friction point. Please retry."
        );
        assert_eq!(
            Notice::RevealFailed.message(),
            "The reveal phase encountered an error."
        );
    }
}
