//! owobridge-common/src/models/events.rs
//!
//! Messages exchanged between the bridge and whatever front-end observes it.

use crate::models::connection::ConnectionState;

/// Published by the bridge; observed by front-ends.
#[derive(Debug, Clone, PartialEq)]
pub enum SuitEvent {
    /// Current connection state, sent on every notification (not only on change).
    ConnectionStateChanged(ConnectionState),

    /// A muscle mapped to `parameter` was pulsed this tick.
    ActiveMuscleUpdate { parameter: String },

    /// Nothing is being touched any more.
    ActiveMuscleReset,
}

impl SuitEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SuitEvent::ConnectionStateChanged(_) => "connection_state",
            SuitEvent::ActiveMuscleUpdate { .. } => "active_muscle_update",
            SuitEvent::ActiveMuscleReset => "active_muscle_reset",
        }
    }
}

/// Requests coming from a front-end (button clicks, console commands).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Connect,
    ToggleInteractions,
}
