//! Application state machine.
//!
//! [`GameState`] holds everything the front end renders and changes only
//! through pure transitions. [`Game`] wires those transitions to the
//! generation and analysis clients and to history persistence.

mod session;
mod state;

pub use session::*;
pub use state::*;
