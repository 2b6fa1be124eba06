//! # Roundtimer Core Library
//!
//! Core logic for a focus/break round timer. The CLI binary is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Phase Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for phase transitions
//! - **Session**: Binds the engine to a periodic tick source and publishes
//!   status updates to subscribers
//! - **Notify**: Notification sink and window controller capabilities
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseEngine`]: Core phase state machine
//! - [`Session`]: Tick-driven session driver
//! - [`TimerConfig`]: Per-session durations and round count
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use notify::{Notification, NotificationKind, Notifier, WindowController};
pub use session::Session;
pub use storage::Config;
pub use timer::{Phase, PhaseEngine, SessionState, StatusView, TimerConfig};
