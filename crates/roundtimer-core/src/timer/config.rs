//! Session configuration: focus length, break length, round count.
//!
//! Every field is at least 1. Setters take raw user text and silently fall
//! back to the field default when the text is not a positive number.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::schedule::{PlannedPhase, Phase};

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_BREAK_MIN: u32 = 5;
pub const DEFAULT_ROUNDS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    focus_duration_min: u32,
    break_duration_min: u32,
    total_rounds: u32,
}

impl TimerConfig {
    /// Build a config from already-numeric values. Zeros become defaults.
    pub fn new(focus_duration_min: u32, break_duration_min: u32, total_rounds: u32) -> Self {
        Self {
            focus_duration_min: positive_or(focus_duration_min, DEFAULT_FOCUS_MIN),
            break_duration_min: positive_or(break_duration_min, DEFAULT_BREAK_MIN),
            total_rounds: positive_or(total_rounds, DEFAULT_ROUNDS),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn focus_duration_min(&self) -> u32 {
        self.focus_duration_min
    }

    pub fn break_duration_min(&self) -> u32 {
        self.break_duration_min
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Length of a phase in minutes. `Done` has no length.
    pub fn phase_duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_duration_min,
            Phase::Break => self.break_duration_min,
            Phase::Done => 0,
        }
    }

    pub fn phase_duration(&self, phase: Phase) -> Duration {
        Duration::minutes(i64::from(self.phase_duration_min(phase)))
    }

    /// Every phase the session will run, in order. Lazy: a session may
    /// have up to `2 * u32::MAX` phases.
    pub fn plan(&self) -> impl Iterator<Item = PlannedPhase> {
        let cfg = *self;
        (1..=cfg.total_rounds).flat_map(move |round| {
            [Phase::Focus, Phase::Break].map(move |phase| PlannedPhase {
                phase,
                round,
                duration_min: cfg.phase_duration_min(phase),
            })
        })
    }

    pub fn phase_count(&self) -> u64 {
        u64::from(self.total_rounds) * 2
    }

    /// Wall-clock minutes from start to completion.
    pub fn total_duration_min(&self) -> u64 {
        u64::from(self.total_rounds)
            * (u64::from(self.focus_duration_min) + u64::from(self.break_duration_min))
    }

    // ── Updates ──────────────────────────────────────────────────────

    pub fn set_focus_duration_min(&mut self, input: &str) {
        self.focus_duration_min = normalize(input, DEFAULT_FOCUS_MIN);
    }

    pub fn set_break_duration_min(&mut self, input: &str) {
        self.break_duration_min = normalize(input, DEFAULT_BREAK_MIN);
    }

    pub fn set_total_rounds(&mut self, input: &str) {
        self.total_rounds = normalize(input, DEFAULT_ROUNDS);
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_duration_min: DEFAULT_FOCUS_MIN,
            break_duration_min: DEFAULT_BREAK_MIN,
            total_rounds: DEFAULT_ROUNDS,
        }
    }
}

fn positive_or(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}

/// Parse user text as a count of whole units.
///
/// Positive values below 1 round up to 1, other fractions are truncated.
/// Zero, negatives, NaN and infinities give `default`. Values past
/// `u32::MAX` saturate.
pub fn normalize(input: &str, default: u32) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.clamp(1.0, f64::from(u32::MAX)) as u32,
        _ => default,
    }
}
