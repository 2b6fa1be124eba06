//! Session driver: binds a [`PhaseEngine`] to a [`TickSource`].
//!
//! The driver owns the tick source for the lifetime of a session. It is
//! acquired on `start()` and released on `stop()`, `reset()`, completion, or
//! drop. Presentation surfaces subscribe to status updates instead of owning
//! a timer themselves.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::{PhaseEngine, StatusView, TickCallback, TickSource, TimerConfig, TICK_PERIOD};

const EVENT_BUFFER: usize = 32;

pub struct Session<T: TickSource> {
    engine: Arc<Mutex<PhaseEngine>>,
    ticker: T,
    status: watch::Sender<StatusView>,
    events: broadcast::Sender<Event>,
}

impl<T: TickSource> Session<T> {
    pub fn new(engine: PhaseEngine, ticker: T) -> Self {
        let (status, _) = watch::channel(engine.status());
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker,
            status,
            events,
        }
    }

    /// Status updates, published after every command and every tick.
    pub fn subscribe(&self) -> watch::Receiver<StatusView> {
        self.status.subscribe()
    }

    /// Engine events raised after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn status(&self) -> Result<StatusView> {
        Ok(self.engine()?.status())
    }

    pub fn is_running(&self) -> Result<bool> {
        Ok(self.engine()?.is_running())
    }

    /// Start a fresh session. A session that is still running is stopped first.
    pub fn start(&mut self, config: &TimerConfig) -> Result<Option<Event>> {
        if self.is_running()? {
            tracing::debug!("stopping running session before restart");
            self.stop()?;
        }
        let event = {
            let mut engine = self.engine()?;
            let event = engine.start(config);
            self.publish(&engine, event.as_ref());
            event
        };
        let on_tick = self.tick_callback();
        self.ticker.start(TICK_PERIOD, on_tick);
        Ok(event)
    }

    /// Cancel ticking, then halt the engine. No tick can transition the
    /// session once this returns.
    pub fn stop(&mut self) -> Result<Option<Event>> {
        self.ticker.cancel();
        let mut engine = self.engine()?;
        let event = engine.stop();
        self.publish(&engine, event.as_ref());
        Ok(event)
    }

    pub fn reset(&mut self) -> Result<Event> {
        self.ticker.cancel();
        let mut engine = self.engine()?;
        let event = engine.reset();
        self.publish(&engine, Some(&event));
        Ok(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn engine(&self) -> Result<MutexGuard<'_, PhaseEngine>> {
        self.engine.lock().map_err(|_| CoreError::EnginePoisoned)
    }

    fn publish(&self, engine: &PhaseEngine, event: Option<&Event>) {
        self.status.send_replace(engine.status());
        if let Some(event) = event {
            // No receivers is fine.
            let _ = self.events.send(event.clone());
        }
    }

    fn tick_callback(&self) -> TickCallback {
        let engine = Arc::clone(&self.engine);
        let status = self.status.clone();
        let events = self.events.clone();
        Box::new(move || {
            let Ok(mut engine) = engine.lock() else {
                tracing::error!("phase engine lock poisoned, ticking stopped");
                return ControlFlow::Break(());
            };
            let event = engine.tick();
            status.send_replace(engine.status());
            if let Some(event) = event {
                let _ = events.send(event);
            }
            if engine.is_running() {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
    }
}

impl<T: TickSource> Drop for Session<T> {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}
