//! Wall-clock pacing for the tick engine.
//!
//! The host reports elapsed milliseconds; [`TickTimer`] accumulates them and
//! reports how many whole tick intervals have passed, carrying the
//! remainder. [`ContextGate`] decides from the active scene whether the
//! timer should be running at all.

use std::collections::BTreeSet;

/// Tick interval used when none (or zero) is configured.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// TickTimer
// ---------------------------------------------------------------------------

/// Fixed-interval accumulator. Stopped on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTimer {
    interval_ms: u64,
    /// Elapsed time not yet spent on a tick.
    accumulator_ms: u64,
    running: bool,
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL_MS)
    }
}

impl TickTimer {
    /// Create a stopped timer. A zero interval falls back to
    /// [`DEFAULT_TICK_INTERVAL_MS`].
    pub fn new(interval_ms: u64) -> Self {
        let interval_ms = if interval_ms == 0 {
            DEFAULT_TICK_INTERVAL_MS
        } else {
            interval_ms
        };
        Self {
            interval_ms,
            accumulator_ms: 0,
            running: false,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn accumulator_ms(&self) -> u64 {
        self.accumulator_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start ticking. Starting a stopped timer begins a fresh interval;
    /// starting a running one does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.accumulator_ms = 0;
        tracing::info!(interval_ms = self.interval_ms, "furnace timer started");
    }

    /// Stop ticking. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::info!("furnace timer stopped");
    }

    /// Feed elapsed time. Returns how many ticks are due.
    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        if !self.running {
            return 0;
        }
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        let due = self.accumulator_ms / self.interval_ms;
        self.accumulator_ms %= self.interval_ms;
        due
    }
}

// ---------------------------------------------------------------------------
// Context gate
// ---------------------------------------------------------------------------

/// The host contexts (scenes) during which furnaces must not tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextGate {
    excluded: BTreeSet<String>,
}

impl ContextGate {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, context: &str) -> bool {
        self.excluded.contains(context)
    }

    /// A context has started: run the timer unless it is excluded.
    pub fn on_context_start(&self, context: &str, timer: &mut TickTimer) {
        if self.is_excluded(context) {
            tracing::debug!(context, "furnaces suspended in excluded context");
            timer.stop();
        } else {
            timer.start();
        }
    }

    /// A context has ended: stop the timer until the next one starts.
    pub fn on_context_end(&self, timer: &mut TickTimer) {
        timer.stop();
    }
}
