// ============================================================================
// PERSISTENCE — debounced flush of a dirty canvas
// ============================================================================

/// Seconds a change may sit unsaved before the next tick flushes it.
pub const FLUSH_THRESHOLD_SECS: f32 = 0.3;

/// While a flush keeps failing, only every Nth failure after the first is logged.
pub const FAILURE_LOG_INTERVAL: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PersistState {
    Clean,
    Dirty { since_flush: f32 },
}

/// What a single [`PersistenceController::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to save.
    Idle,
    /// Dirty, threshold not crossed yet.
    Pending,
    /// Flush succeeded; now clean.
    Flushed,
    /// Flush failed; still dirty and retried on the next tick.
    FlushFailed,
}

/// Dirty/clean state machine with a time accumulator.
#[derive(Debug)]
pub struct PersistenceController {
    state: PersistState,
    threshold: f32,
    consecutive_failures: u32,
    failure_warnings: u32,
}

impl Default for PersistenceController {
    fn default() -> Self {
        Self::new(FLUSH_THRESHOLD_SECS)
    }
}

impl PersistenceController {
    pub fn new(threshold: f32) -> Self {
        Self {
            state: PersistState::Clean,
            threshold,
            consecutive_failures: 0,
            failure_warnings: 0,
        }
    }

    pub fn state(&self) -> PersistState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.state, PersistState::Dirty { .. })
    }

    /// Seconds accumulated since the canvas became dirty (0 when clean).
    pub fn time_since_flush(&self) -> f32 {
        match self.state {
            PersistState::Clean => 0.0,
            PersistState::Dirty { since_flush } => since_flush,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Warnings logged for the current run of failures.
    pub fn failure_warnings(&self) -> u32 {
        self.failure_warnings
    }

    /// Record a change. An already-dirty accumulator keeps running.
    pub fn mark_dirty(&mut self) {
        if self.state == PersistState::Clean {
            self.state = PersistState::Dirty { since_flush: 0.0 };
        }
    }

    /// Advance by `dt` seconds, running `flush` once the threshold is exceeded.
    pub fn tick<E, F>(&mut self, dt: f32, flush: F) -> TickOutcome
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<(), E>,
    {
        let PersistState::Dirty { since_flush } = self.state else {
            return TickOutcome::Idle;
        };
        let elapsed = since_flush + dt.max(0.0);
        if elapsed <= self.threshold {
            self.state = PersistState::Dirty { since_flush: elapsed };
            return TickOutcome::Pending;
        }

        self.run_flush(elapsed, flush)
    }

    /// Flush immediately if dirty, ignoring the threshold.
    pub fn flush_now<E, F>(&mut self, flush: F) -> TickOutcome
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<(), E>,
    {
        let elapsed = self.time_since_flush();
        if !self.is_dirty() {
            return TickOutcome::Idle;
        }
        self.run_flush(elapsed, flush)
    }

    fn run_flush<E, F>(&mut self, elapsed: f32, flush: F) -> TickOutcome
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<(), E>,
    {
        match flush() {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    log_info!(
                        "Flush recovered after {} failed attempt(s)",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                self.failure_warnings = 0;
                self.state = PersistState::Clean;
                TickOutcome::Flushed
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if should_log_failure(self.consecutive_failures) {
                    self.failure_warnings += 1;
                    log_warn!(
                        "Flush failed (attempt {}), will retry: {}",
                        self.consecutive_failures,
                        e
                    );
                }
                self.state = PersistState::Dirty { since_flush: elapsed };
                TickOutcome::FlushFailed
            }
        }
    }
}

/// First failure, then every [`FAILURE_LOG_INTERVAL`]th one.
fn should_log_failure(attempt: u32) -> bool {
    attempt == 1 || attempt % FAILURE_LOG_INTERVAL == 0
}
