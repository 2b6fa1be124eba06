use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the phase engine produces an Event.
/// Presentation surfaces and the CLI print or forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A focus or break phase began (session start or transition).
    PhaseStarted {
        phase: Phase,
        round: u32,
        total_rounds: u32,
        duration_secs: u64,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// The last break expired; the session is over.
    SessionCompleted {
        total_rounds: u32,
        at: DateTime<Utc>,
    },
    SessionStopped {
        phase: Phase,
        round: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
}
