//! Session controller state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::{Change, Effect};
pub use event::Event;
pub use state::{SessionContext, SessionState, DEFAULT_RESPONSE_DELAY};
pub use transition::{transition, TransitionError};
