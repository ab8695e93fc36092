use core::cmp;

use crate::provider::PositionProvider;
use crate::types::{Align, VisibleRange};

/// Default number of extra items included on each side of the visible range.
pub const DEFAULT_OVERSCAN: usize = 3;

/// Computes the overscanned visible range for a scroll position.
///
/// The scroll offset is clamped to the scrollable extent first, so an
/// overflowed offset yields a range ending at the last item rather than an
/// empty result. An empty collection, a zero viewport, or a zero total size
/// all yield [`VisibleRange::EMPTY`].
pub fn compute_visible_range<P: PositionProvider + ?Sized>(
    provider: &mut P,
    scroll_offset: u64,
    viewport_size: u32,
    overscan: usize,
) -> VisibleRange {
    let count = provider.len();
    if count == 0 || viewport_size == 0 {
        return VisibleRange::EMPTY;
    }
    let total = provider.total_size();
    if total == 0 {
        return VisibleRange::EMPTY;
    }

    let view = viewport_size as u64;
    let max_scroll = total.saturating_sub(view);
    let offset = scroll_offset.min(max_scroll);
    // `view >= 1` here, so the last visible offset never underflows past `offset`.
    let last_visible = cmp::max(offset, offset.saturating_add(view).saturating_sub(1));

    let first = provider.index_at_offset(offset);
    let last = provider.index_at_offset(last_visible);

    let start_index = first.saturating_sub(overscan);
    let end_index = cmp::min(count, last.saturating_add(1).saturating_add(overscan));
    let start_offset = provider
        .position(start_index)
        .map(|p| p.start)
        .unwrap_or(0);

    VisibleRange {
        start_index,
        end_index,
        start_offset,
    }
}

/// Computes the clamped scroll offset that brings `index` into view with the
/// requested alignment.
///
/// `Align::Auto` keeps the current offset when the item is already fully
/// visible and otherwise scrolls just far enough from the nearest edge.
pub fn scroll_target<P: PositionProvider + ?Sized>(
    provider: &mut P,
    index: usize,
    align: Align,
    viewport_size: u32,
    current_offset: u64,
) -> u64 {
    let count = provider.len();
    if count == 0 {
        return 0;
    }
    let index = index.min(count - 1);
    let Some(pos) = provider.position(index) else {
        return 0;
    };
    let view = viewport_size as u64;

    let target = match align {
        Align::Start => pos.start,
        Align::End => pos.end().saturating_sub(view),
        Align::Center => {
            let center = pos.start.saturating_add(pos.size as u64 / 2);
            center.saturating_sub(view / 2)
        }
        Align::Auto => {
            let current_end = current_offset.saturating_add(view);
            if pos.start >= current_offset && pos.end() <= current_end {
                current_offset
            } else if pos.start < current_offset {
                pos.start
            } else {
                pos.end().saturating_sub(view)
            }
        }
    };

    target.min(provider.total_size().saturating_sub(view))
}

/// Scales overscan with how many items fit in the viewport, damped by half,
/// clamped to `1..=5`.
///
/// Large viewports prefetch a few more items so fast scrolls hit fewer
/// unrendered slots; tiny viewports avoid rendering several screens of
/// offscreen items.
pub fn dynamic_overscan(viewport_size: u32, estimated_size: u32) -> usize {
    if estimated_size == 0 {
        return DEFAULT_OVERSCAN;
    }
    let visible = (viewport_size / estimated_size) as usize;
    (visible / 2).clamp(1, 5)
}
