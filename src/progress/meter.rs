use rand::Rng;

/// Value shown once the tracked operation has really finished.
pub const COMPLETE: f64 = 100.0;

/// Ceiling used when a configured one is outside `(0, 100)`.
pub const DEFAULT_CEILING: f64 = 95.0;

const STEP_RATIO: f64 = 0.15;
const BURST_RATIO: f64 = 0.35;

/// Status lines cycled while a reveal is pending, in display order.
pub const REVEAL_PHRASES: [&str; 5] = [
    "Reading the room",
    "Tracing micro-expressions",
    "Mapping power dynamics",
    "Modelling the counter-move",
    "Extracting tactical insight",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Plain,
    /// Also cycle [`REVEAL_PHRASES`].
    Phrases,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub percent: f64,
    pub phrase: Option<&'static str>,
    pub running: bool,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            percent: 0.0,
            phrase: None,
            running: false,
        }
    }
}

/// Advance a simulated percentage by one tick.
///
/// The step is a random fraction of the distance left to 100, larger while
/// `burst_allowed`. The result is never below `current` and, whenever
/// `current < ceiling`, strictly below `ceiling`.
pub fn next_value<R: Rng + ?Sized>(
    current: f64,
    ceiling: f64,
    burst_allowed: bool,
    rng: &mut R,
) -> f64 {
    if current >= ceiling {
        return current;
    }

    let ratio = if burst_allowed { BURST_RATIO } else { STEP_RATIO };
    let candidate = current + rng.random::<f64>() * ratio * (COMPLETE - current);
    if candidate < ceiling {
        return candidate;
    }

    let halfway = current + (ceiling - current) / 2.0;
    if halfway < ceiling { halfway } else { current }
}

/// Index into a phrase list of `count` entries for `percent`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn phrase_index(percent: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let scaled = (percent.max(0.0) / COMPLETE * count as f64).floor() as usize;
    scaled.min(count - 1)
}

/// Clock-free progress state. [`super::ProgressSimulator`] drives it from a
/// timer; tests drive it directly.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    value: f64,
    ceiling: f64,
    mode: ProgressMode,
    running: bool,
}

impl ProgressMeter {
    pub fn new(ceiling: f64) -> Self {
        let ceiling = if ceiling > 0.0 && ceiling < COMPLETE {
            ceiling
        } else {
            DEFAULT_CEILING
        };
        Self {
            value: 0.0,
            ceiling,
            mode: ProgressMode::Plain,
            running: false,
        }
    }

    pub fn start(&mut self, mode: ProgressMode) {
        self.value = 0.0;
        self.mode = mode;
        self.running = true;
    }

    /// One simulated step. No-op unless running.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if self.running {
            let burst_allowed = self.value < self.ceiling / 2.0;
            self.value = next_value(self.value, self.ceiling, burst_allowed, rng);
        }
        self.value
    }

    pub fn complete(&mut self) {
        self.running = false;
        self.value = COMPLETE;
    }

    /// Return to idle after the completion hold.
    pub fn settle(&mut self) {
        self.running = false;
        self.value = 0.0;
        self.mode = ProgressMode::Plain;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phrase(&self) -> Option<&'static str> {
        match self.mode {
            ProgressMode::Plain => None,
            ProgressMode::Phrases => {
                Some(REVEAL_PHRASES[phrase_index(self.value, REVEAL_PHRASES.len())])
            }
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            percent: self.value,
            phrase: self.phrase(),
            running: self.running,
        }
    }
}
