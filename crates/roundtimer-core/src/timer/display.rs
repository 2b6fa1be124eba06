//! Derived display values. Pure functions of engine state and the clock.
//!
//! Remaining time is rounded up to the whole second: the last second of a
//! phase reads `00:01` and `00:00` appears only once the deadline is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::Phase;

/// Seconds left until `deadline`, rounded up. Zero without a deadline.
pub fn remaining_seconds(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    let Some(deadline) = deadline else {
        return 0;
    };
    let ms = (deadline - now).num_milliseconds().max(0) as u64;
    ms.div_ceil(1000)
}

/// `MM:SS`, both zero-padded. Minutes are not wrapped into hours.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// What a status surface shows while a session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub phase: Phase,
    pub round: u32,
    pub total_rounds: u32,
    pub running: bool,
    pub remaining_secs: u64,
    /// `remaining_secs` as `MM:SS`.
    pub remaining: String,
}

impl StatusView {
    /// One line, e.g. `Focus · round 2/4 · 12:03`.
    pub fn line(&self) -> String {
        match self.phase {
            Phase::Done => format!("Done · {} rounds complete", self.total_rounds),
            phase if self.running => format!(
                "{phase} · round {}/{} · {}",
                self.round, self.total_rounds, self.remaining
            ),
            phase => format!("{phase} · round {}/{} · stopped", self.round, self.total_rounds),
        }
    }
}
