use alloc::sync::Arc;

use windower::{Rect, ScrollBehavior, ScrollState, ScrollTracker};

use crate::tween::{Easing, Tween};

/// A callback fired when the applied scroll offset changes.
pub type OnScrollCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// A callback fired when the visible range changes.
///
/// The arguments are `start_index` and `end_index` (exclusive).
pub type OnRangeChangeCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Shared scroll/viewport plumbing for the window types.
///
/// Owns the tracker, the viewport rect, the mounted flag, debounced resize
/// state, and the optional smooth-scroll tween. Windows wrap it and add
/// their layout math on top.
#[derive(Clone)]
pub(crate) struct Pane {
    pub(crate) tracker: ScrollTracker,
    pub(crate) rect: Rect,
    pub(crate) mounted: bool,
    pub(crate) tween: Option<Tween>,
    pub(crate) reduced_motion: bool,
    pub(crate) smooth_duration_ms: u64,
    pub(crate) easing: Easing,
    pub(crate) resize_debounce_ms: u64,
    pub(crate) pending_rect: Option<Rect>,
    pub(crate) last_resize_ms: Option<u64>,
    pub(crate) on_scroll: Option<OnScrollCallback>,
    pub(crate) last_emitted_offset: u64,
}

impl Pane {
    pub(crate) fn new() -> Self {
        Self {
            tracker: ScrollTracker::new(),
            rect: Rect::default(),
            mounted: false,
            tween: None,
            reduced_motion: false,
            smooth_duration_ms: 240,
            easing: Easing::SmoothStep,
            resize_debounce_ms: 200,
            pending_rect: None,
            last_resize_ms: None,
            on_scroll: None,
            last_emitted_offset: 0,
        }
    }

    pub(crate) fn mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn viewport_main(&self) -> u32 {
        self.rect.main
    }

    pub(crate) fn offset(&self) -> u64 {
        self.tracker.offset()
    }

    pub(crate) fn is_scrolling(&self) -> bool {
        self.tracker.is_scrolling()
    }

    pub(crate) fn scroll_state(&self) -> ScrollState {
        self.tracker.state()
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Applies viewport geometry immediately. The first call mounts the
    /// window; imperative operations are no-ops until then.
    pub(crate) fn set_viewport(&mut self, rect: Rect) -> bool {
        self.mounted = true;
        self.pending_rect = None;
        self.last_resize_ms = None;
        if self.rect == rect {
            return false;
        }
        self.rect = rect;
        true
    }

    /// Queues a resize observation. Each call restarts the debounce window;
    /// the rect is applied by `flush_resize` once the burst goes quiet.
    pub(crate) fn queue_resize(&mut self, rect: Rect, now_ms: u64) {
        if !self.mounted {
            self.set_viewport(rect);
            return;
        }
        self.pending_rect = Some(rect);
        self.last_resize_ms = Some(now_ms);
    }

    pub(crate) fn flush_resize(&mut self, now_ms: u64) -> bool {
        let (Some(rect), Some(queued_ms)) = (self.pending_rect, self.last_resize_ms) else {
            return false;
        };
        if now_ms.saturating_sub(queued_ms) < self.resize_debounce_ms {
            return false;
        }
        wdebug!(main = rect.main, cross = rect.cross, "flush_resize");
        self.pending_rect = None;
        self.last_resize_ms = None;
        if self.rect == rect {
            return false;
        }
        self.rect = rect;
        true
    }

    /// Records a raw scroll event from the host. A user scroll takes over
    /// from any programmatic animation.
    pub(crate) fn on_scroll_event(&mut self, offset: u64, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        self.tween = None;
        self.tracker.on_scroll_event(offset, now_ms);
        true
    }

    /// Advances tween and frame state. Returns the offset the host must
    /// apply to its real scroll container when a tween moved the viewport.
    pub(crate) fn advance(&mut self, now_ms: u64) -> Option<u64> {
        if let Some(tween) = self.tween {
            let off = tween.sample(now_ms);
            self.tracker.apply(off, now_ms);
            if tween.is_done(now_ms) {
                self.tween = None;
                self.tracker.set_is_scrolling(false);
            }
            Some(self.tracker.offset())
        } else {
            self.tracker.on_frame(now_ms);
            None
        }
    }

    /// Starts a programmatic scroll to `target`.
    ///
    /// Reduced motion downgrades `Smooth` to an instant jump. A smooth
    /// scroll over an in-flight tween retargets it instead of restarting.
    pub(crate) fn start_scroll(
        &mut self,
        target: u64,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> u64 {
        let instant = self.reduced_motion
            || behavior == ScrollBehavior::Instant
            || self.smooth_duration_ms == 0;
        if instant {
            self.tween = None;
            self.tracker.set_offset(target);
            return target;
        }
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, target, self.smooth_duration_ms),
            None => {
                self.tween = Some(Tween::new(
                    self.tracker.offset(),
                    target,
                    now_ms,
                    self.smooth_duration_ms,
                    self.easing,
                ));
            }
        }
        target
    }

    /// Keyboard-style relative scroll, applied immediately and clamped to
    /// `[0, max_scroll]`.
    pub(crate) fn scroll_by(&mut self, delta: i64, max_scroll: u64, now_ms: u64) -> u64 {
        let cur = self.tracker.offset();
        let target = if delta >= 0 {
            cur.saturating_add(delta as u64).min(max_scroll)
        } else {
            cur.saturating_sub(delta.unsigned_abs())
        };
        self.tween = None;
        self.tracker.apply(target, now_ms);
        target
    }

    pub(crate) fn set_offset_clamped(&mut self, offset: u64, max_scroll: u64) {
        self.tracker.set_offset(offset.min(max_scroll));
    }

    pub(crate) fn shift(&mut self, delta: i64) {
        self.tracker.shift(delta);
    }

    pub(crate) fn reset_scroll(&mut self) {
        self.tween = None;
        self.tracker.reset();
    }

    /// Drops everything in flight: the pending scroll event, the queued
    /// resize, and any tween. The offset itself is kept.
    pub(crate) fn cancel(&mut self) {
        self.tween = None;
        self.pending_rect = None;
        self.last_resize_ms = None;
        self.tracker.cancel();
    }

    pub(crate) fn emit_scroll(&mut self) {
        let offset = self.tracker.offset();
        if self.last_emitted_offset == offset {
            return;
        }
        self.last_emitted_offset = offset;
        if let Some(cb) = &self.on_scroll {
            cb(offset);
        }
    }
}

impl core::fmt::Debug for Pane {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pane")
            .field("tracker", &self.tracker)
            .field("rect", &self.rect)
            .field("mounted", &self.mounted)
            .field("tween", &self.tween)
            .field("reduced_motion", &self.reduced_motion)
            .field("smooth_duration_ms", &self.smooth_duration_ms)
            .field("resize_debounce_ms", &self.resize_debounce_ms)
            .finish_non_exhaustive()
    }
}
