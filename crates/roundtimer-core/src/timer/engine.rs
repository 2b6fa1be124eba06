//! Phase engine implementation.
//!
//! The phase engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Focus(r) -> Break(r) -> Focus(r + 1) -> ... -> Break(total) -> Done
//! ```
//!
//! `stop()` freezes the current phase and round; `reset()` also rewinds them
//! to Focus / round 1. Neither restarts the session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseEngine::new(Arc::new(SystemClock), Arc::new(LogNotifier));
//! engine.start(&TimerConfig::default());
//! // Once a second:
//! engine.tick(); // Returns Some(Event) when a phase expires
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::config::TimerConfig;
use super::display::{format_mmss, remaining_seconds, StatusView};
use super::schedule::Phase;
use crate::events::Event;
use crate::notify::{NoWindow, Notification, Notifier, WindowController};

/// Mutable part of a session. Only [`PhaseEngine`] writes to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    /// 1-based. Meaningless once `phase` is `Done`.
    pub round: u32,
    /// Present iff `running` and the phase is Focus or Break.
    pub deadline: Option<DateTime<Utc>>,
    pub running: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Focus,
            round: 1,
            deadline: None,
            running: false,
        }
    }
}

/// Core phase engine.
///
/// Operates on wall-clock deadlines from the injected [`Clock`]. Side
/// effects go through the injected [`Notifier`] and [`WindowController`].
pub struct PhaseEngine {
    /// Copy captured by the last `start()`.
    config: TimerConfig,
    state: SessionState,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    window: Arc<dyn WindowController>,
}

impl PhaseEngine {
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: TimerConfig::default(),
            state: SessionState::default(),
            clock,
            notifier,
            window: Arc::new(NoWindow),
        }
    }

    pub fn with_window_controller(mut self, window: Arc<dyn WindowController>) -> Self {
        self.window = window;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.state.deadline
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Configuration of the current (or last) session.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn remaining_seconds(&self) -> u64 {
        remaining_seconds(self.state.deadline, self.clock.now())
    }

    pub fn formatted_remaining(&self) -> String {
        format_mmss(self.remaining_seconds())
    }

    pub fn status(&self) -> StatusView {
        let remaining_secs = self.remaining_seconds();
        StatusView {
            phase: self.state.phase,
            round: self.state.round,
            total_rounds: self.config.total_rounds(),
            running: self.state.running,
            remaining_secs,
            remaining: format_mmss(remaining_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session with a copy of `config`.
    ///
    /// Starting while a session is running is a caller error: it is logged
    /// and ignored. Stop the running session first.
    pub fn start(&mut self, config: &TimerConfig) -> Option<Event> {
        if self.state.running {
            tracing::warn!(
                phase = %self.state.phase,
                round = self.state.round,
                "start ignored: session already running"
            );
            return None;
        }
        self.config = *config;
        self.state.running = true;
        let now = self.clock.now();
        let event = self.begin_phase(Phase::Focus, 1, now);
        self.window.dismiss();
        Some(event)
    }

    /// Call periodically. Returns `Some(Event)` when the current phase expired.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        let deadline = self.state.deadline?;
        let now = self.clock.now();
        if now < deadline {
            tracing::trace!(remaining_secs = remaining_seconds(Some(deadline), now), "tick");
            return None;
        }
        self.transition(now)
    }

    /// Halt the session, keeping phase and round. No-op when nothing runs.
    ///
    /// The stop notification fires only when this call changes state, so a
    /// repeated `stop()` is silent.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.state.running && self.state.deadline.is_none() {
            return None;
        }
        self.state.running = false;
        self.state.deadline = None;
        tracing::info!(phase = %self.state.phase, round = self.state.round, "session stopped");
        self.notifier.notify(Notification::failure("Pomodoro stopped"));
        Some(Event::SessionStopped {
            phase: self.state.phase,
            round: self.state.round,
            at: self.clock.now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.stop();
        self.state.phase = Phase::Focus;
        self.state.round = 1;
        Event::SessionReset {
            at: self.clock.now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let round = self.state.round;
        let total = self.config.total_rounds();
        match self.state.phase {
            Phase::Focus => {
                self.notifier
                    .notify(Notification::success("Focus complete, time for a break"));
                Some(self.begin_phase(Phase::Break, round, now))
            }
            Phase::Break if round < total => {
                self.notifier
                    .notify(Notification::success(format!("Round {} of {total}", round + 1)));
                Some(self.begin_phase(Phase::Focus, round + 1, now))
            }
            Phase::Break => {
                self.state.phase = Phase::Done;
                self.state.deadline = None;
                self.state.running = false;
                tracing::info!(rounds = total, "session complete");
                self.notifier.notify(Notification::success("Session complete"));
                Some(Event::SessionCompleted {
                    total_rounds: total,
                    at: now,
                })
            }
            Phase::Done => None,
        }
    }

    fn begin_phase(&mut self, phase: Phase, round: u32, now: DateTime<Utc>) -> Event {
        let minutes = self.config.phase_duration_min(phase);
        let deadline = now + self.config.phase_duration(phase);
        self.state.phase = phase;
        self.state.round = round;
        self.state.deadline = Some(deadline);

        tracing::info!(%phase, round, minutes, %deadline, "phase started");
        let title = match phase {
            Phase::Focus => format!("Focus #{round}"),
            _ => phase.label().to_string(),
        };
        self.notifier
            .notify(Notification::transient(title, format!("{minutes} min")));

        Event::PhaseStarted {
            phase,
            round,
            total_rounds: self.config.total_rounds(),
            duration_secs: u64::from(minutes) * 60,
            deadline,
            at: now,
        }
    }
}

impl std::fmt::Debug for PhaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::timer::clock::ManualClock;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingWindow {
        dismissed: AtomicUsize,
    }

    impl WindowController for CountingWindow {
        fn dismiss(&self) {
            self.dismissed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn engine() -> (PhaseEngine, ManualClock, RecordingNotifier) {
        let clock = ManualClock::default();
        let rec = RecordingNotifier::new();
        let engine = PhaseEngine::new(Arc::new(clock.clone()), Arc::new(rec.clone()));
        (engine, clock, rec)
    }

    fn cfg(focus: u32, brk: u32, rounds: u32) -> TimerConfig {
        TimerConfig::new(focus, brk, rounds)
    }

    #[test]
    fn start_enters_focus_round_one() {
        let (mut engine, clock, rec) = engine();
        let ev = engine.start(&cfg(25, 5, 2));
        assert!(matches!(ev, Some(Event::PhaseStarted { phase: Phase::Focus, round: 1, .. })));
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.round(), 1);
        assert!(engine.is_running());
        assert_eq!(engine.deadline(), Some(clock.now() + Duration::minutes(25)));
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert_eq!(
            rec.take(),
            vec![Notification::transient("Focus #1", "25 min")]
        );
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(25, 5, 2));
        clock.advance(Duration::minutes(3));
        assert!(engine.start(&cfg(50, 10, 8)).is_none());
        assert_eq!(engine.config(), &cfg(25, 5, 2));
        assert_eq!(engine.remaining_seconds(), 22 * 60);
    }

    #[test]
    fn tick_before_deadline_does_nothing() {
        let (mut engine, clock, rec) = engine();
        engine.start(&cfg(25, 5, 2));
        rec.take();
        clock.advance(Duration::minutes(25) - Duration::milliseconds(1));
        assert!(engine.tick().is_none());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_seconds(), 1);
        assert!(rec.all().is_empty());
    }

    #[test]
    fn focus_expiry_moves_to_break_once() {
        let (mut engine, clock, rec) = engine();
        engine.start(&cfg(25, 5, 2));
        rec.take();
        clock.advance(Duration::minutes(25));
        let expired_at = clock.now();

        assert!(engine.tick().is_some());
        assert!(engine.tick().is_none());
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.deadline(), Some(expired_at + Duration::minutes(5)));

        let seen = rec.take();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].kind, NotificationKind::Success);
        assert_eq!(seen[1], Notification::transient("Break", "5 min"));
    }

    #[test]
    fn break_expiry_increments_round() {
        let (mut engine, clock, rec) = engine();
        engine.start(&cfg(25, 5, 2));
        clock.advance(Duration::minutes(25));
        engine.tick();
        rec.take();
        clock.advance(Duration::minutes(5));

        let ev = engine.tick();
        assert!(matches!(ev, Some(Event::PhaseStarted { phase: Phase::Focus, round: 2, .. })));
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.round(), 2);
        let seen = rec.take();
        assert_eq!(seen[0], Notification::success("Round 2 of 2"));
        assert_eq!(seen[1], Notification::transient("Focus #2", "25 min"));
    }

    #[test]
    fn last_break_completes_session() {
        let (mut engine, clock, rec) = engine();
        engine.start(&cfg(1, 1, 1));
        clock.advance(Duration::minutes(1));
        engine.tick();
        rec.take();
        clock.advance(Duration::minutes(1));

        let ev = engine.tick();
        assert!(matches!(ev, Some(Event::SessionCompleted { total_rounds: 1, .. })));
        assert_eq!(engine.phase(), Phase::Done);
        assert_eq!(engine.deadline(), None);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_seconds(), 0);
        assert_eq!(rec.take(), vec![Notification::success("Session complete")]);
    }

    #[test]
    fn late_tick_still_fires_a_single_transition() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(1, 1, 3));
        // Asleep for far longer than several phases.
        clock.advance(Duration::hours(2));
        engine.tick();
        assert_eq!((engine.phase(), engine.round()), (Phase::Break, 1));
        assert_eq!(engine.remaining_seconds(), 60);
    }

    #[test]
    fn stop_keeps_phase_and_clears_deadline() {
        let (mut engine, clock, rec) = engine();
        engine.start(&cfg(25, 5, 2));
        rec.take();
        clock.advance(Duration::minutes(10));

        assert!(matches!(engine.stop(), Some(Event::SessionStopped { phase: Phase::Focus, round: 1, .. })));
        assert!(!engine.is_running());
        assert_eq!(engine.deadline(), None);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(rec.take(), vec![Notification::failure("Pomodoro stopped")]);

        clock.advance(Duration::hours(1));
        assert!(engine.tick().is_none());
        assert_eq!(engine.phase(), Phase::Focus);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut engine, _, rec) = engine();
        engine.start(&cfg(25, 5, 2));
        engine.stop();
        let once = engine.state().clone();
        assert!(engine.stop().is_none());
        assert_eq!(engine.state(), &once);
        assert_eq!(
            rec.all()
                .iter()
                .filter(|n| n.kind == NotificationKind::Failure)
                .count(),
            1
        );
    }

    #[test]
    fn reset_rewinds_without_restarting() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(1, 1, 3));
        clock.advance(Duration::minutes(1));
        engine.tick();
        clock.advance(Duration::minutes(1));
        engine.tick();
        assert_eq!(engine.round(), 2);

        engine.reset();
        assert_eq!(engine.state(), &SessionState::default());
        clock.advance(Duration::hours(1));
        assert!(engine.tick().is_none());
    }

    #[test]
    fn status_reflects_state() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(2, 1, 3));
        clock.advance(Duration::seconds(55));
        let view = engine.status();
        assert_eq!(view.remaining_secs, 65);
        assert_eq!(view.remaining, "01:05");
        assert_eq!(view.total_rounds, 3);
        assert_eq!(engine.formatted_remaining(), "01:05");
    }

    #[test]
    fn window_is_dismissed_only_by_an_accepted_start() {
        let (engine, clock, _) = engine();
        let window = Arc::new(CountingWindow::default());
        let mut engine = engine.with_window_controller(window.clone());
        let dismissed = || window.dismissed.load(Ordering::SeqCst);

        engine.start(&cfg(1, 1, 2));
        assert_eq!(dismissed(), 1);
        assert!(engine.start(&cfg(1, 1, 2)).is_none());
        assert_eq!(dismissed(), 1, "ignored start leaves the window alone");

        clock.advance(Duration::minutes(1));
        engine.tick();
        clock.advance(Duration::minutes(1));
        engine.tick();
        assert_eq!(engine.round(), 2);
        engine.stop();
        engine.reset();
        assert_eq!(dismissed(), 1);

        engine.start(&cfg(1, 1, 2));
        assert_eq!(dismissed(), 2);
    }

    #[test]
    fn countdown_never_increases_within_a_phase() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(1, 1, 1));
        let deadline = engine.deadline().unwrap();
        assert_eq!(engine.remaining_seconds(), 60);
        assert_eq!(engine.formatted_remaining(), "01:00");

        let mut last = engine.remaining_seconds();
        while clock.now() < deadline {
            clock.advance(Duration::milliseconds(250));
            let now = engine.remaining_seconds();
            assert!(now <= last, "went from {last} to {now}");
            last = now;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn last_second_reads_one_until_the_deadline() {
        let (mut engine, clock, _) = engine();
        engine.start(&cfg(1, 1, 1));
        clock.advance(Duration::seconds(60) - Duration::milliseconds(1));
        assert_eq!(engine.formatted_remaining(), "00:01");
        assert!(engine.tick().is_none());

        clock.advance(Duration::milliseconds(1));
        assert_eq!(engine.remaining_seconds(), 0);
        assert_eq!(engine.formatted_remaining(), "00:00");
        assert!(engine.tick().is_some());
        assert_eq!(engine.phase(), Phase::Break);
    }
}
