use core::cmp;

use crate::types::{ScrollDirection, ScrollState};

/// Frame-coalescing scroll offset tracker with trailing-edge idle detection.
///
/// Hosts report raw scroll events with [`ScrollTracker::on_scroll_event`];
/// arbitrarily many events between two frames collapse into one pending
/// offset. Calling [`ScrollTracker::on_frame`] once per animation frame
/// applies at most that one pending offset, so downstream range computation
/// runs at frame rate no matter how fast events arrive.
///
/// `is_scrolling` is debounced, not throttled: every event restarts the idle
/// window, and the flag clears only after `idle_delay_ms` with no events.
/// The tracker owns no clocks or timers; the host passes monotonic `now_ms`
/// timestamps into every time-sensitive method.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    offset: u64,
    pending: Option<u64>,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_event_ms: Option<u64>,
    idle_delay_ms: u64,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self {
            offset: 0,
            pending: None,
            is_scrolling: false,
            scroll_direction: None,
            last_event_ms: None,
            idle_delay_ms: 150,
        }
    }

    /// Sets how long after the last scroll event `is_scrolling` resets.
    pub fn with_idle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.idle_delay_ms = delay_ms;
        self
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn idle_delay_ms(&self) -> u64 {
        self.idle_delay_ms
    }

    /// Whether a scroll event is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            offset: self.offset,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Records a raw scroll event from the host.
    ///
    /// The offset is stored as the single pending update for the next frame,
    /// replacing any earlier pending value. Marks the tracker as scrolling
    /// and restarts the idle window.
    pub fn on_scroll_event(&mut self, offset: u64, now_ms: u64) {
        wtrace!(offset, now_ms, "on_scroll_event");
        self.pending = Some(offset);
        self.last_event_ms = Some(now_ms);
        self.is_scrolling = true;
    }

    /// Applies the pending scroll offset, if any, then runs idle detection.
    ///
    /// Call once per animation frame. Returns the newly applied offset when
    /// a pending event was consumed.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<u64> {
        let applied = self.pending.take().map(|offset| {
            self.set_offset(offset);
            offset
        });
        self.poll_idle(now_ms);
        applied
    }

    /// Clears `is_scrolling` once `idle_delay_ms` has passed with no new
    /// scroll events. Returns `true` when the flag was cleared by this call.
    ///
    /// `on_frame` runs this automatically; hosts with their own timers can
    /// also call it directly.
    pub fn poll_idle(&mut self, now_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) < self.idle_delay_ms {
            return false;
        }
        self.is_scrolling = false;
        self.scroll_direction = None;
        self.last_event_ms = None;
        true
    }

    /// Applies an offset immediately, bypassing the pending slot, and marks
    /// the tracker as scrolling. Used for programmatic movement such as
    /// animation frames of a smooth scroll.
    pub fn apply(&mut self, offset: u64, now_ms: u64) {
        wtrace!(offset, now_ms, "apply");
        self.set_offset(offset);
        self.last_event_ms = Some(now_ms);
        self.is_scrolling = true;
    }

    /// Sets the offset without touching the scrolling state. Used for
    /// instant programmatic positioning.
    pub fn set_offset(&mut self, offset: u64) {
        if self.offset == offset {
            return;
        }
        let prev = self.offset;
        self.offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
    }

    /// Shifts the offset by a signed delta without changing direction or
    /// scrolling state. Used for scroll-position adjustment when an item
    /// before the viewport is re-measured.
    pub fn shift(&mut self, delta: i64) {
        if delta > 0 {
            self.offset = self.offset.saturating_add(delta as u64);
        } else {
            self.offset = self.offset.saturating_sub(delta.unsigned_abs());
        }
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_event_ms = None;
        }
    }

    /// Drops the pending offset and idle timer state. A subsequent
    /// `on_frame` applies nothing; use on teardown so nothing fires after
    /// the host is gone.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_event_ms = None;
        self.is_scrolling = false;
        self.scroll_direction = None;
    }

    /// Returns to offset zero, not scrolling, with nothing pending.
    pub fn reset(&mut self) {
        self.cancel();
        self.offset = 0;
    }
}
