use alloc::sync::Arc;
use alloc::vec::Vec;

use windower::{
    Align, DEFAULT_OVERSCAN, ItemPosition, PositionProvider, Rect, ScrollBehavior, ScrollState,
    ScrollTracker, VisibleRange, compute_visible_range, scroll_target,
};

use crate::anchor::{ScrollAnchor, anchor_offset, capture_anchor};
use crate::pane::{OnRangeChangeCallback, OnScrollCallback, Pane};
use crate::tween::Easing;

/// Configuration for [`TimelineWindow`].
#[derive(Clone)]
pub struct TimelineOptions {
    /// Event extent along the scroll axis, gap excluded.
    pub item_main: u32,
    /// Gap between consecutive events.
    pub gap: u32,
    /// Extra events rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Whether date markers are laid out between day boundaries.
    pub show_markers: bool,
    /// Extent reserved for each interior date marker.
    pub marker_main: u32,
    /// Maps a timestamp to a day bucket. Consecutive events whose buckets
    /// differ get a marker between them. Defaults to the UTC day index for
    /// millisecond timestamps.
    pub day_of: Arc<dyn Fn(i64) -> i64 + Send + Sync>,
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
    /// Fired when the visible event range changes.
    pub on_visible_range_change: Option<OnRangeChangeCallback>,
}

impl TimelineOptions {
    pub fn new(item_main: u32) -> Self {
        Self {
            item_main,
            gap: 0,
            overscan: DEFAULT_OVERSCAN,
            show_markers: true,
            marker_main: 40,
            day_of: Arc::new(|ts: i64| ts.div_euclid(86_400_000)),
            idle_delay_ms: 150,
            resize_debounce_ms: 200,
            smooth_duration_ms: 240,
            easing: Easing::default(),
            reduced_motion: false,
            on_scroll: None,
            on_visible_range_change: None,
        }
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_show_markers(mut self, show: bool) -> Self {
        self.show_markers = show;
        self
    }

    pub fn with_marker_main(mut self, marker_main: u32) -> Self {
        self.marker_main = marker_main;
        self
    }

    pub fn with_day_of(mut self, day_of: impl Fn(i64) -> i64 + Send + Sync + 'static) -> Self {
        self.day_of = Arc::new(day_of);
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

impl core::fmt::Debug for TimelineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimelineOptions")
            .field("item_main", &self.item_main)
            .field("gap", &self.gap)
            .field("overscan", &self.overscan)
            .field("show_markers", &self.show_markers)
            .field("marker_main", &self.marker_main)
            .field("idle_delay_ms", &self.idle_delay_ms)
            .field("resize_debounce_ms", &self.resize_debounce_ms)
            .field("smooth_duration_ms", &self.smooth_duration_ms)
            .field("easing", &self.easing)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

/// A date boundary laid out between two runs of events.
///
/// The leading marker (before the first event) sits at offset zero and
/// consumes no space; interior markers reserve `marker_main` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateMarker {
    /// Day bucket as produced by the `day_of` closure.
    pub day: i64,
    /// Offset of the marker along the scroll axis.
    pub start: u64,
    /// Index of the first event on this day.
    pub first_index: usize,
}

/// A renderable event of the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineSlot {
    /// Index in timestamp order.
    pub index: usize,
    /// Position of the event in the unsorted input.
    pub source_index: usize,
    pub timestamp: i64,
    pub start: u64,
    pub size: u32,
}

#[derive(Clone, Copy, Debug)]
struct TimelineEntry {
    timestamp: i64,
    source: usize,
}

/// Precomputed event offsets. Rebuilt wholesale on every data change since
/// marker insertion shifts everything after a day boundary anyway.
#[derive(Clone, Debug, Default)]
struct TimelineLayout {
    starts: Vec<u64>,
    item_main: u32,
    total: u64,
}

impl PositionProvider for TimelineLayout {
    fn len(&self) -> usize {
        self.starts.len()
    }

    fn position(&mut self, index: usize) -> Option<ItemPosition> {
        let start = *self.starts.get(index)?;
        Some(ItemPosition {
            start,
            size: self.item_main,
            estimated: false,
        })
    }

    fn total_size(&mut self) -> u64 {
        self.total
    }

    fn index_at_offset(&mut self, offset: u64) -> usize {
        if self.starts.is_empty() {
            return 0;
        }
        let item = u64::from(self.item_main);
        self.starts
            .partition_point(|&start| start.saturating_add(item) <= offset)
            .min(self.starts.len() - 1)
    }
}

/// A windowed chronological feed: events sorted by timestamp, with date
/// markers inserted where consecutive events fall on different days.
///
/// Event extents are fixed, but marker insertion makes offsets irregular,
/// so positions are precomputed per event and queried by binary search.
///
/// The host feeds events in (`set_viewport`, `on_scroll_event`,
/// `on_resize`) and calls [`tick`](Self::tick) once per animation frame;
/// callbacks fire only when the offset or visible range actually changed.
#[derive(Clone, Debug)]
pub struct TimelineWindow {
    options: TimelineOptions,
    pane: Pane,
    entries: Vec<TimelineEntry>,
    layout: TimelineLayout,
    markers: Vec<DateMarker>,
    last_range: Option<(usize, usize)>,
}

impl TimelineWindow {
    pub fn new(options: TimelineOptions) -> Self {
        wdebug!(item_main = options.item_main, "timeline window created");
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
            entries: Vec::new(),
            layout: TimelineLayout::default(),
            markers: Vec::new(),
            last_range: None,
        }
    }

    pub fn event_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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

    /// Total extent of events and interior markers along the scroll axis.
    pub fn total_size(&self) -> u64 {
        self.layout.total
    }

    fn max_scroll(&self) -> u64 {
        self.layout
            .total
            .saturating_sub(u64::from(self.pane.viewport_main()))
    }

    /// Remaining scrollable content below the viewport.
    pub fn distance_to_end(&self) -> u64 {
        let end = self
            .pane
            .offset()
            .saturating_add(u64::from(self.pane.viewport_main()));
        self.layout.total.saturating_sub(end)
    }

    /// Timestamp of the event at `index`, in timestamp order.
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.entries.get(index).map(|e| e.timestamp)
    }

    /// Position of the event at `index` in the unsorted input.
    pub fn source_index(&self, index: usize) -> Option<usize> {
        self.entries.get(index).map(|e| e.source)
    }

    /// Replaces the event set. Timestamps are sorted ascending; equal
    /// timestamps keep their input order. The scroll offset is clamped to
    /// the new extent.
    pub fn set_events(&mut self, timestamps: impl IntoIterator<Item = i64>) {
        self.entries = timestamps
            .into_iter()
            .enumerate()
            .map(|(source, timestamp)| TimelineEntry { timestamp, source })
            .collect();
        self.entries.sort_by_key(|e| e.timestamp);
        self.rebuild();
        let max = self.max_scroll();
        self.pane.set_offset_clamped(self.pane.offset(), max);
        self.sync();
    }

    /// All date markers, in offset order.
    pub fn markers(&self) -> &[DateMarker] {
        &self.markers
    }

    /// The visible range in event space, overscan included.
    pub fn visible_range(&mut self) -> VisibleRange {
        compute_visible_range(
            &mut self.layout,
            self.pane.offset(),
            self.pane.viewport_main(),
            self.options.overscan,
        )
    }

    /// Visits every renderable event in the visible range in offset order.
    pub fn for_each_visible_event(&mut self, mut f: impl FnMut(TimelineSlot)) {
        let range = self.visible_range();
        for index in range.start_index..range.end_index {
            let entry = self.entries[index];
            f(TimelineSlot {
                index,
                source_index: entry.source,
                timestamp: entry.timestamp,
                start: self.layout.starts[index],
                size: self.options.item_main,
            });
        }
    }

    /// Visits the date markers that intersect the visible range, including
    /// one directly above it.
    pub fn for_each_visible_marker(&mut self, mut f: impl FnMut(DateMarker)) {
        if !self.options.show_markers {
            return;
        }
        let range = self.visible_range();
        if range.is_empty() {
            return;
        }
        let last_start = self.layout.starts[range.end_index - 1];
        let end = last_start.saturating_add(u64::from(self.options.item_main));
        let lo = range
            .start_offset
            .saturating_sub(u64::from(self.options.marker_main));
        let from = self.markers.partition_point(|m| m.start < lo);
        for marker in &self.markers[from..] {
            if marker.start >= end {
                break;
            }
            f(*marker);
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

    /// Scrolls so the event at `index` satisfies `align`. Returns the
    /// final target offset, or `None` before mount or with no events.
    pub fn scroll_to_event(
        &mut self,
        index: usize,
        align: Align,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        if !self.pane.mounted() || self.entries.is_empty() {
            return None;
        }
        let target = scroll_target(
            &mut self.layout,
            index,
            align,
            self.pane.viewport_main(),
            self.pane.offset(),
        );
        let applied = self.pane.start_scroll(target, behavior, now_ms);
        self.sync();
        Some(applied)
    }

    /// Scrolls to the event nearest to `timestamp`. A tie between two
    /// neighbors prefers the earlier event.
    pub fn scroll_to_date(
        &mut self,
        timestamp: i64,
        align: Align,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        let index = self.nearest_event(timestamp)?;
        self.scroll_to_event(index, align, behavior, now_ms)
    }

    /// Index of the event nearest to `timestamp`, or `None` with no
    /// events.
    pub fn nearest_event(&self, timestamp: i64) -> Option<usize> {
        let after = self.entries.partition_point(|e| e.timestamp < timestamp);
        let before = after.checked_sub(1);
        let after = (after < self.entries.len()).then_some(after);
        match (before, after) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                let da = self.entries[a].timestamp.abs_diff(timestamp);
                let db = self.entries[b].timestamp.abs_diff(timestamp);
                if db < da { Some(b) } else { Some(a) }
            }
        }
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

    /// Captures the event under the viewport top, for restoring the
    /// reading position around a prepend. Returns `None` with no events.
    pub fn capture_anchor(&mut self) -> Option<ScrollAnchor> {
        let offset = self.pane.offset();
        capture_anchor(&mut self.layout, offset)
    }

    /// Restores a captured anchor after `prepended` events were inserted
    /// ahead of it. Returns the applied offset.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor, prepended: usize) -> Option<u64> {
        let offset = anchor_offset(&mut self.layout, anchor, prepended)?;
        let max = self.max_scroll();
        self.pane.set_offset_clamped(offset, max);
        self.sync();
        Some(self.pane.offset())
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.sync();
    }

    /// Toggles date markers and relays out the feed.
    pub fn set_show_markers(&mut self, show: bool) {
        if self.options.show_markers == show {
            return;
        }
        self.options.show_markers = show;
        self.rebuild();
        let max = self.max_scroll();
        self.pane.set_offset_clamped(self.pane.offset(), max);
        self.sync();
    }

    /// Tears the window down: drops pending events, in-flight animation,
    /// and the mounted flag, so nothing fires afterwards.
    pub fn unmount(&mut self) {
        self.pane.cancel();
        self.pane.mounted = false;
    }

    fn rebuild(&mut self) {
        let n = self.entries.len();
        let item = u64::from(self.options.item_main);
        let gap = u64::from(self.options.gap);
        let marker = u64::from(self.options.marker_main);
        let mut starts = Vec::with_capacity(n);
        self.markers.clear();
        let mut cursor = 0u64;
        let mut prev_day: Option<i64> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let day = (self.options.day_of)(entry.timestamp);
            if self.options.show_markers && prev_day != Some(day) {
                if prev_day.is_some() {
                    self.markers.push(DateMarker {
                        day,
                        start: cursor,
                        first_index: i,
                    });
                    cursor = cursor.saturating_add(marker);
                } else {
                    // The leading marker overlays the top edge instead of
                    // pushing the first event down.
                    self.markers.push(DateMarker {
                        day,
                        start: 0,
                        first_index: i,
                    });
                }
            }
            prev_day = Some(day);
            starts.push(cursor);
            cursor = cursor.saturating_add(item);
            if i + 1 < n {
                cursor = cursor.saturating_add(gap);
            }
        }
        self.layout = TimelineLayout {
            starts,
            item_main: self.options.item_main,
            total: cursor,
        };
        wtrace!(
            events = n,
            markers = self.markers.len(),
            total = cursor,
            "timeline laid out"
        );
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
