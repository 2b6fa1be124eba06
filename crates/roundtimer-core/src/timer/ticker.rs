//! Periodic tick sources.
//!
//! A [`TickSource`] invokes a callback on a fixed period until cancelled or
//! until the callback returns `ControlFlow::Break`. Production code uses
//! [`TokioTicker`]; tests drive [`ManualTicker`] by hand.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Period of the phase engine tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub type TickCallback = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

pub trait TickSource: Send {
    /// Schedule `on_tick` every `period`, replacing any previous schedule.
    /// The first call happens one full period after `start`.
    fn start(&mut self, period: Duration, on_tick: TickCallback);

    /// Stop scheduling. A callback already executing is allowed to finish,
    /// but no new invocation begins after this returns.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Tick source backed by a `tokio::time::interval` task.
#[derive(Debug)]
pub struct TokioTicker {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }

    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TickSource for TokioTicker {
    fn start(&mut self, period: Duration, mut on_tick: TickCallback) {
        self.cancel();
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    tracing::debug!("tick source finished");
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Tick source that fires only when [`ManualTicker::fire`] is called.
/// Clones share the same schedule.
#[derive(Clone, Default)]
pub struct ManualTicker {
    callback: Arc<Mutex<Option<TickCallback>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick. Returns false when nothing is scheduled.
    pub fn fire(&self) -> bool {
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(on_tick) = slot.as_mut() else {
            return false;
        };
        if on_tick().is_break() {
            *slot = None;
        }
        true
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, _period: Duration, on_tick: TickCallback) {
        *self.callback.lock().unwrap_or_else(PoisonError::into_inner) = Some(on_tick);
    }

    fn cancel(&mut self) {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn is_active(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualTicker")
            .field("active", &self.is_active())
            .finish()
    }
}
