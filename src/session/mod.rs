//! One simulation session: the explicit state machine and the async driver
//! that runs its effects.

mod driver;
mod machine;

pub use driver::SessionDriver;
pub use machine::{Effect, Event, Notice, RequestId, SessionState, Transition, transition};
