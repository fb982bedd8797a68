//! Cosmetic progress indicator for generation calls of unknown duration.
//!
//! The percentage is simulated: it climbs towards a ceiling below 100 on a
//! fixed tick and only reaches 100 when the caller reports completion.

mod meter;
mod simulator;

pub use meter::{
    COMPLETE, DEFAULT_CEILING, ProgressMeter, ProgressMode, ProgressSnapshot, REVEAL_PHRASES,
    next_value, phrase_index,
};
pub use simulator::ProgressSimulator;
