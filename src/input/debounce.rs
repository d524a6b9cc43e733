//! Coalescing of resize signals
//!
//! Widths are recorded with caller-supplied timestamps and only released once
//! no newer width arrived for a full window, so a burst of resize events
//! yields exactly one value: the latest width.

use crate::core::config::Breakpoint;
use instant::Instant;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<(f64, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records a width; restarts the quiet window
    pub fn record(&mut self, width: f64, at: Instant) {
        self.pending = Some((width, at));
    }

    /// Releases the latest width once the window has elapsed since the last record
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((width, at)) if now.saturating_duration_since(at) >= self.window => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Tracks the active breakpoint behind a debouncer
#[derive(Debug, Clone)]
pub struct BreakpointWatcher {
    debouncer: ResizeDebouncer,
    current: Breakpoint,
    width: Option<f64>,
    recomputes: u64,
}

impl BreakpointWatcher {
    pub fn new(initial: Breakpoint, window: Duration) -> Self {
        Self {
            debouncer: ResizeDebouncer::new(window),
            current: initial,
            width: None,
            recomputes: 0,
        }
    }

    pub fn on_resize(&mut self, width: f64, at: Instant) {
        self.debouncer.record(width, at);
    }

    /// Returns the new breakpoint if the settled width changed it
    pub fn poll(&mut self, now: Instant) -> Option<Breakpoint> {
        let width = self.debouncer.poll(now)?;
        self.recomputes += 1;
        self.width = Some(width);

        let next = Breakpoint::from_width(width);
        if next == self.current {
            return None;
        }

        #[cfg(feature = "debug")]
        log::debug!("Breakpoint {} -> {} at width {}", self.current.as_str(), next.as_str(), width);

        self.current = next;
        Some(next)
    }

    pub fn current(&self) -> Breakpoint {
        self.current
    }

    /// Last settled width
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// How many settled widths were evaluated
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}
