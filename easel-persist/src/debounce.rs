//! Trailing-edge debounce timer.
//!
//! A cancellable delayed task: `schedule` invalidates any pending handle and
//! arms a new deadline, `poll` fires at most once per armed deadline. Time
//! is passed in, never read, so callers decide which clock drives it.

use std::time::Duration;

/// Identifies one armed deadline. Stale handles never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet_ms: u64,
    generation: u64,
    pending: Option<(TimerHandle, u64)>,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet_ms: quiet.as_millis() as u64,
            generation: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }

    /// Cancel whatever is pending and arm a new deadline at `now + quiet`.
    pub fn schedule(&mut self, now_ms: u64) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        let deadline = now_ms.saturating_add(self.quiet_ms);
        if let Some((old, _)) = self.pending.replace((handle, deadline)) {
            tracing::trace!(cancelled = old.0, rescheduled = handle.0, "debounce reset");
        }
        handle
    }

    /// Disarm without firing. Returns the cancelled handle, if any.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }

    /// Fire if the armed deadline has passed. Fires at most once.
    pub fn poll(&mut self, now_ms: u64) -> Option<TimerHandle> {
        match self.pending {
            Some((handle, deadline)) if now_ms >= deadline => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Whether `handle` is the one currently armed.
    pub fn is_current(&self, handle: TimerHandle) -> bool {
        matches!(self.pending, Some((h, _)) if h == handle)
    }
}
