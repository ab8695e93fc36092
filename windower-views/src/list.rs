use windower::{
    Align, DEFAULT_OVERSCAN, ItemPosition, Rect, ScrollBehavior, ScrollState, ScrollTracker,
    SizeStore, VisibleRange, compute_visible_range, scroll_target,
};

use crate::pane::{OnRangeChangeCallback, OnScrollCallback, Pane};
use crate::tween::Easing;

/// Configuration for [`ListWindow`].
#[derive(Clone)]
pub struct ListOptions {
    /// Total number of items in the collection.
    pub count: usize,
    /// Assumed extent of an unmeasured item along the scroll axis.
    pub estimated_main: u32,
    /// Extra items rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Smallest accepted measurement. Zero-size items collapse range
    /// queries, so measurements are clamped up to this.
    pub min_main: u32,
    /// Re-measurements changing an item by less than this are ignored.
    pub noise: u32,
    /// Whether measuring an item above the viewport shifts the scroll
    /// offset to keep on-screen content still.
    pub adjust_on_measure: bool,
    /// Idle delay for the is-scrolling flag, in milliseconds.
    pub idle_delay_ms: u64,
    /// Debounce applied to resize observations, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Duration of smooth programmatic scrolls. Zero makes them instant.
    pub smooth_duration_ms: u64,
    /// Easing curve for smooth programmatic scrolls.
    pub easing: Easing,
    /// When set, smooth scrolls are downgraded to instant jumps.
    pub reduced_motion: bool,
    /// Fired when the applied scroll offset changes.
    pub on_scroll: Option<OnScrollCallback>,
    /// Fired when the visible item range changes.
    pub on_visible_range_change: Option<OnRangeChangeCallback>,
}

impl ListOptions {
    pub fn new(count: usize, estimated_main: u32) -> Self {
        Self {
            count,
            estimated_main,
            overscan: DEFAULT_OVERSCAN,
            min_main: 1,
            noise: 1,
            adjust_on_measure: true,
            idle_delay_ms: 150,
            resize_debounce_ms: 200,
            smooth_duration_ms: 240,
            easing: Easing::default(),
            reduced_motion: false,
            on_scroll: None,
            on_visible_range_change: None,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_min_main(mut self, min_main: u32) -> Self {
        self.min_main = min_main;
        self
    }

    pub fn with_noise(mut self, noise: u32) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_adjust_on_measure(mut self, adjust: bool) -> Self {
        self.adjust_on_measure = adjust;
        self
    }

    pub fn with_idle_delay_ms(mut self, ms: u64) -> Self {
        self.idle_delay_ms = ms;
        self
    }

    pub fn with_resize_debounce_ms(mut self, ms: u64) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    pub fn with_smooth_duration_ms(mut self, ms: u64) -> Self {
        self.smooth_duration_ms = ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn with_on_scroll(mut self, cb: OnScrollCallback) -> Self {
        self.on_scroll = Some(cb);
        self
    }

    pub fn with_on_visible_range_change(mut self, cb: OnRangeChangeCallback) -> Self {
        self.on_visible_range_change = Some(cb);
        self
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("count", &self.count)
            .field("estimated_main", &self.estimated_main)
            .field("overscan", &self.overscan)
            .field("min_main", &self.min_main)
            .field("noise", &self.noise)
            .field("adjust_on_measure", &self.adjust_on_measure)
            .field("idle_delay_ms", &self.idle_delay_ms)
            .field("resize_debounce_ms", &self.resize_debounce_ms)
            .field("smooth_duration_ms", &self.smooth_duration_ms)
            .field("easing", &self.easing)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

/// A windowed list of variable-height items.
///
/// Items start out at an estimated extent; the host reports real extents
/// as they render, and positions converge. Measuring an item above the
/// viewport shifts the scroll offset by the size delta so on-screen
/// content does not jump.
///
/// The host feeds events in (`set_viewport`, `on_scroll_event`,
/// `on_resize`) and calls [`tick`](Self::tick) once per animation frame;
/// callbacks fire only when the offset or visible range actually changed.
#[derive(Clone, Debug)]
pub struct ListWindow {
    options: ListOptions,
    pane: Pane,
    store: SizeStore,
    last_range: Option<(usize, usize)>,
}

impl ListWindow {
    pub fn new(options: ListOptions) -> Self {
        wdebug!(
            count = options.count,
            estimated_main = options.estimated_main,
            "list window created"
        );
        let store = SizeStore::new(options.count, options.estimated_main)
            .with_min_size(options.min_main)
            .with_noise(options.noise);
        let pane = Pane {
            tracker: ScrollTracker::new().with_idle_delay_ms(options.idle_delay_ms),
            reduced_motion: options.reduced_motion,
            smooth_duration_ms: options.smooth_duration_ms,
            easing: options.easing,
            resize_debounce_ms: options.resize_debounce_ms,
            on_scroll: options.on_scroll.clone(),
            ..Pane::new()
        };
        Self {
            options,
            pane,
            store,
            last_range: None,
        }
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn estimated_main(&self) -> u32 {
        self.store.estimate()
    }

    pub fn viewport(&self) -> Rect {
        self.pane.rect()
    }

    pub fn is_mounted(&self) -> bool {
        self.pane.mounted()
    }

    pub fn scroll_position(&self) -> u64 {
        self.pane.offset()
    }

    pub fn is_scrolling(&self) -> bool {
        self.pane.is_scrolling()
    }

    pub fn is_animating(&self) -> bool {
        self.pane.is_animating()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.pane.scroll_state()
    }

    /// Total extent of the list, measured sizes where known and estimates
    /// elsewhere.
    pub fn total_size(&mut self) -> u64 {
        self.store.total_size()
    }

    fn max_scroll(&mut self) -> u64 {
        let viewport = u64::from(self.pane.viewport_main());
        self.store.total_size().saturating_sub(viewport)
    }

    /// Remaining scrollable content below the viewport.
    pub fn distance_to_end(&mut self) -> u64 {
        let end = self
            .pane
            .offset()
            .saturating_add(u64::from(self.pane.viewport_main()));
        self.store.total_size().saturating_sub(end)
    }

    pub fn item_position(&mut self, index: usize) -> Option<ItemPosition> {
        self.store.position(index)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.store.is_measured(index)
    }

    /// Reports a rendered item's real extent.
    ///
    /// Returns the scroll adjustment that was applied to keep on-screen
    /// content still, or zero when the measurement changed nothing, was
    /// rejected, or the item sits at or below the viewport top.
    pub fn measure(&mut self, index: usize, size: u32) -> i64 {
        let shifted = self.measure_inner(index, size);
        self.sync();
        shifted
    }

    /// Reports a batch of measurements. Returns the accumulated scroll
    /// adjustment.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        let mut shifted = 0i64;
        for (index, size) in measurements {
            shifted += self.measure_inner(index, size);
        }
        self.sync();
        shifted
    }

    fn measure_inner(&mut self, index: usize, size: u32) -> i64 {
        let prev = i64::from(self.store.get_size(index));
        let Some(position) = self.store.position(index) else {
            return 0;
        };
        if !self.store.set_size(index, size) {
            return 0;
        }
        let delta = i64::from(self.store.get_size(index)) - prev;
        if delta != 0 && self.options.adjust_on_measure && position.start < self.pane.offset() {
            self.pane.shift(delta);
            return delta;
        }
        0
    }

    /// The visible range, overscan included.
    pub fn visible_range(&mut self) -> VisibleRange {
        compute_visible_range(
            &mut self.store,
            self.pane.offset(),
            self.pane.viewport_main(),
            self.options.overscan,
        )
    }

    /// Visits every renderable item in the visible range in index order.
    pub fn for_each_visible_item(&mut self, mut f: impl FnMut(usize, ItemPosition)) {
        let range = self.visible_range();
        for index in range.start_index..range.end_index {
            if let Some(position) = self.store.position(index) {
                f(index, position);
            }
        }
    }

    /// Applies viewport geometry immediately. The first call mounts the
    /// window.
    pub fn set_viewport(&mut self, rect: Rect) {
        self.pane.set_viewport(rect);
        self.sync();
    }

    /// Records a resize observation. The new rect is debounced and applied
    /// by a later [`tick`](Self::tick) once the burst goes quiet.
    pub fn on_resize(&mut self, rect: Rect, now_ms: u64) {
        self.pane.queue_resize(rect, now_ms);
    }

    /// Records a raw scroll event. Returns `false` before the window is
    /// mounted. The offset is applied on the next [`tick`](Self::tick).
    pub fn on_scroll_event(&mut self, offset: u64, now_ms: u64) -> bool {
        self.pane.on_scroll_event(offset, now_ms)
    }

    /// Per-frame update: applies coalesced scroll events, flushes a quiet
    /// resize, advances any smooth scroll, and fires change callbacks.
    ///
    /// Returns the offset the host must write back to its scroll container
    /// when a smooth scroll moved the viewport this frame.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        self.pane.flush_resize(now_ms);
        let applied = self.pane.advance(now_ms);
        self.sync();
        applied
    }

    /// Scrolls so the item at `index` satisfies `align`. Returns the final
    /// target offset, or `None` before mount or for an empty list.
    ///
    /// Unmeasured items downstream make the target approximate; it lands
    /// exactly once sizes converge.
    pub fn scroll_to_item(
        &mut self,
        index: usize,
        align: Align,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        if !self.pane.mounted() || self.store.count() == 0 {
            return None;
        }
        let viewport = self.pane.viewport_main();
        let offset = self.pane.offset();
        let target = scroll_target(&mut self.store, index, align, viewport, offset);
        let applied = self.pane.start_scroll(target, behavior, now_ms);
        self.sync();
        Some(applied)
    }

    /// Relative scroll, applied immediately and clamped. Returns the new
    /// offset.
    pub fn scroll_by(&mut self, delta: i64, now_ms: u64) -> u64 {
        let max = self.max_scroll();
        let applied = self.pane.scroll_by(delta, max, now_ms);
        self.sync();
        applied
    }

    pub fn reset_scroll(&mut self) {
        self.pane.reset_scroll();
        self.sync();
    }

    /// Updates the item count, keeping in-range measurements and the
    /// scroll offset inside the new extent. Appending pages preserves
    /// everything already measured.
    pub fn set_item_count(&mut self, count: usize) {
        self.store.set_count(count);
        let max = self.max_scroll();
        let offset = self.pane.offset();
        self.pane.set_offset_clamped(offset, max);
        self.sync();
    }

    /// Updates the estimate applied to unmeasured items.
    pub fn set_estimate(&mut self, estimate: u32) {
        self.store.set_estimate(estimate);
        let max = self.max_scroll();
        let offset = self.pane.offset();
        self.pane.set_offset_clamped(offset, max);
        self.sync();
    }

    /// Drops every measurement, keeping the count. The offset is clamped,
    /// not reset, so the view does not jump to the top.
    pub fn reset_items(&mut self) {
        self.store.reset();
        let max = self.max_scroll();
        let offset = self.pane.offset();
        self.pane.set_offset_clamped(offset, max);
        self.sync();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.sync();
    }

    /// Tears the window down: drops pending events, in-flight animation,
    /// and the mounted flag, so nothing fires afterwards.
    pub fn unmount(&mut self) {
        self.pane.cancel();
        self.pane.mounted = false;
    }

    fn sync(&mut self) {
        self.pane.emit_scroll();
        let range = self.visible_range();
        let bounds = (range.start_index, range.end_index);
        if self.last_range != Some(bounds) {
            self.last_range = Some(bounds);
            if let Some(cb) = &self.options.on_visible_range_change {
                cb(bounds.0, bounds.1);
            }
        }
    }
}
