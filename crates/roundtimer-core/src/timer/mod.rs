mod clock;
mod config;
mod display;
mod engine;
mod schedule;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{normalize, TimerConfig, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN, DEFAULT_ROUNDS};
pub use display::{format_mmss, remaining_seconds, StatusView};
pub use engine::{PhaseEngine, SessionState};
pub use schedule::{Phase, PlannedPhase};
pub use ticker::{ManualTicker, TickCallback, TickSource, TokioTicker, TICK_PERIOD};
