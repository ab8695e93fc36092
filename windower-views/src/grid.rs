use windower::{
    Align, DEFAULT_OVERSCAN, FixedLayout, PositionProvider, Rect, ScrollBehavior, ScrollState,
    ScrollTracker, VisibleRange, compute_visible_range, scroll_target,
};

use crate::pane::{OnRangeChangeCallback, OnScrollCallback, Pane};
use crate::tween::Easing;

/// Configuration for [`GridWindow`].
#[derive(Clone)]
pub struct GridOptions {
    /// Total number of items in the collection.
    pub count: usize,
    /// Number of columns per row.
    pub columns: usize,
    /// Row extent along the scroll axis, gap excluded.
    pub item_main: u32,
    /// Gap between rows and between columns.
    pub gap: u32,
    /// Extra rows rendered beyond each edge of the viewport.
    pub overscan: usize,
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

impl GridOptions {
    pub fn new(count: usize, columns: usize, item_main: u32) -> Self {
        Self {
            count,
            columns,
            item_main,
            gap: 0,
            overscan: DEFAULT_OVERSCAN,
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

impl core::fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOptions")
            .field("count", &self.count)
            .field("columns", &self.columns)
            .field("item_main", &self.item_main)
            .field("gap", &self.gap)
            .field("overscan", &self.overscan)
            .field("idle_delay_ms", &self.idle_delay_ms)
            .field("resize_debounce_ms", &self.resize_debounce_ms)
            .field("smooth_duration_ms", &self.smooth_duration_ms)
            .field("easing", &self.easing)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

/// A renderable cell of the grid.
///
/// `start`/`size` are along the scroll axis; `cross_start`/`cross_size`
/// are along the other one, in fractional units so uneven viewport widths
/// divide cleanly.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridItem {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub start: u64,
    pub size: u32,
    pub cross_start: f32,
    pub cross_size: f32,
}

/// A windowed fixed-size grid: `count` items laid out row by row across
/// `columns` columns, all rows sharing one extent.
///
/// Scrolling happens in row space. Because every row has the same pitch,
/// range queries are plain arithmetic and never touch a size cache.
///
/// The host feeds events in (`set_viewport`, `on_scroll_event`,
/// `on_resize`) and calls [`tick`](Self::tick) once per animation frame;
/// callbacks fire only when the offset or visible range actually changed.
#[derive(Clone, Debug)]
pub struct GridWindow {
    options: GridOptions,
    pane: Pane,
    last_range: Option<(usize, usize)>,
}

impl GridWindow {
    pub fn new(options: GridOptions) -> Self {
        wdebug!(
            count = options.count,
            columns = options.columns,
            "grid window created"
        );
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
            last_range: None,
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn columns(&self) -> usize {
        self.options.columns
    }

    pub fn row_count(&self) -> usize {
        if self.options.columns == 0 {
            0
        } else {
            self.options.count.div_ceil(self.options.columns)
        }
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

    fn row_layout(&self) -> FixedLayout {
        FixedLayout::new(self.row_count(), self.options.item_main, self.options.gap)
    }

    /// Total extent of all rows along the scroll axis.
    pub fn total_size(&self) -> u64 {
        let mut layout = self.row_layout();
        layout.total_size()
    }

    fn max_scroll(&self) -> u64 {
        self.total_size()
            .saturating_sub(u64::from(self.pane.viewport_main()))
    }

    /// Remaining scrollable content below the viewport.
    pub fn distance_to_end(&self) -> u64 {
        let end = self
            .pane
            .offset()
            .saturating_add(u64::from(self.pane.viewport_main()));
        self.total_size().saturating_sub(end)
    }

    /// Column width implied by the viewport's cross extent, with gaps
    /// taken out. Fractional so three columns of a 900-unit viewport get
    /// equal widths.
    pub fn column_width(&self) -> f32 {
        let columns = self.options.columns;
        if columns == 0 {
            return 0.0;
        }
        let gaps = self.options.gap as f32 * (columns as f32 - 1.0);
        let avail = self.pane.rect().cross as f32 - gaps;
        (avail / columns as f32).max(0.0)
    }

    /// The visible range in row space, overscan included.
    pub fn visible_rows(&self) -> VisibleRange {
        let mut layout = self.row_layout();
        compute_visible_range(
            &mut layout,
            self.pane.offset(),
            self.pane.viewport_main(),
            self.options.overscan,
        )
    }

    /// The visible range in item space: visible rows expanded to the items
    /// they contain, the partial last row clipped to `count`.
    pub fn visible_range(&self) -> VisibleRange {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return VisibleRange::EMPTY;
        }
        let columns = self.options.columns;
        VisibleRange {
            start_index: rows.start_index * columns,
            end_index: (rows.end_index * columns).min(self.options.count),
            start_offset: rows.start_offset,
        }
    }

    /// Visits every renderable cell in the visible range in index order.
    pub fn for_each_visible_item(&self, mut f: impl FnMut(GridItem)) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let columns = self.options.columns;
        let pitch = u64::from(self.options.item_main) + u64::from(self.options.gap);
        let cross_size = self.column_width();
        let cross_pitch = cross_size + self.options.gap as f32;
        for row in rows.start_index..rows.end_index {
            let start = row as u64 * pitch;
            for column in 0..columns {
                let index = row * columns + column;
                if index >= self.options.count {
                    return;
                }
                f(GridItem {
                    index,
                    row,
                    column,
                    start,
                    size: self.options.item_main,
                    cross_start: column as f32 * cross_pitch,
                    cross_size,
                });
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
    /// target offset, or `None` before mount or for an empty grid.
    pub fn scroll_to_item(
        &mut self,
        index: usize,
        align: Align,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        if !self.pane.mounted() || self.options.count == 0 || self.options.columns == 0 {
            return None;
        }
        let row = index.min(self.options.count - 1) / self.options.columns;
        let mut layout = self.row_layout();
        let target = scroll_target(
            &mut layout,
            row,
            align,
            self.pane.viewport_main(),
            self.pane.offset(),
        );
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

    /// Updates the item count, keeping the offset inside the new extent.
    pub fn set_item_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        let max = self.max_scroll();
        self.pane.set_offset_clamped(self.pane.offset(), max);
        self.sync();
    }

    /// Updates the column count, keeping the offset inside the new extent.
    pub fn set_columns(&mut self, columns: usize) {
        if self.options.columns == columns {
            return;
        }
        wdebug!(columns, "grid columns changed");
        self.options.columns = columns;
        let max = self.max_scroll();
        self.pane.set_offset_clamped(self.pane.offset(), max);
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
