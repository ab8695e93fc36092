use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use windower::{Align, FixedLayout, Rect, ScrollBehavior};

use crate::*;

fn rect(main: u32, cross: u32) -> Rect {
    Rect { main, cross }
}

// ---------------------------------------------------------------- tween

#[test]
fn tween_sample_reaches_target_and_clamps() {
    let tween = Tween::new(0, 1_000, 0, 200, Easing::Linear);
    assert_eq!(tween.sample(0), 0);
    assert_eq!(tween.sample(100), 500);
    assert_eq!(tween.sample(200), 1_000);
    assert_eq!(tween.sample(300), 1_000);
    assert!(!tween.is_done(199));
    assert!(tween.is_done(200));
}

#[test]
fn tween_easings_meet_at_the_midpoint() {
    for easing in [Easing::Linear, Easing::SmoothStep, Easing::EaseInOutCubic] {
        let tween = Tween::new(0, 1_000, 0, 200, easing);
        assert_eq!(tween.sample(100), 500);
        assert_eq!(tween.sample(200), 1_000);
    }
}

#[test]
fn tween_retarget_is_continuous() {
    let mut tween = Tween::new(0, 1_000, 0, 200, Easing::Linear);
    tween.retarget(100, 2_000, 200);
    assert_eq!(tween.sample(100), 500);
    assert_eq!(tween.sample(300), 2_000);
    assert!(tween.is_done(300));
}

// --------------------------------------------------------------- anchor

#[test]
fn anchor_round_trips_across_a_prepend() {
    let mut layout = FixedLayout::new(10, 100, 0);
    let anchor = capture_anchor(&mut layout, 250).unwrap();
    assert_eq!(anchor.index, 2);
    assert_eq!(anchor.offset_into_item, 50);

    let mut grown = FixedLayout::new(13, 100, 0);
    assert_eq!(anchor_offset(&mut grown, &anchor, 3), Some(550));

    let mut empty = FixedLayout::new(0, 100, 0);
    assert_eq!(capture_anchor(&mut empty, 0), None);
}

// ----------------------------------------------------------------- grid

#[test]
fn grid_windows_a_three_column_card_wall() {
    let mut grid = GridWindow::new(GridOptions::new(1_000, 3, 200).with_gap(16));
    grid.set_viewport(rect(800, 900));
    grid.on_scroll_event(2_000, 0);
    grid.tick(16);

    assert_eq!(grid.row_count(), 334);
    assert_eq!(grid.total_size(), 72_128);

    // Rows 9..=12 are visible; overscan 3 widens to rows 6..16.
    let rows = grid.visible_rows();
    assert_eq!((rows.start_index, rows.end_index), (6, 16));
    let range = grid.visible_range();
    assert_eq!((range.start_index, range.end_index), (18, 48));
    assert_eq!(range.start_offset, 1_296);

    assert!((grid.column_width() - 289.333_34).abs() < 0.01);
}

#[test]
fn grid_clips_the_partial_last_row() {
    let mut grid = GridWindow::new(GridOptions::new(7, 3, 100));
    grid.set_viewport(rect(1_000, 300));

    assert_eq!(grid.visible_range().end_index, 7);
    let mut items = Vec::new();
    grid.for_each_visible_item(|item| items.push(item));
    assert_eq!(items.len(), 7);
    let last = items[6];
    assert_eq!((last.index, last.row, last.column), (6, 2, 0));
    assert_eq!(items[1].cross_start, 100.0);
    assert_eq!(items[1].cross_size, 100.0);
}

#[test]
fn grid_ignores_events_before_mount() {
    let mut grid = GridWindow::new(GridOptions::new(100, 4, 50));
    assert!(!grid.is_mounted());
    assert!(!grid.on_scroll_event(100, 0));
    assert_eq!(
        grid.scroll_to_item(10, Align::Start, ScrollBehavior::Instant, 0),
        None
    );

    grid.set_viewport(rect(400, 400));
    assert!(grid.is_mounted());
    assert!(grid.on_scroll_event(100, 0));
}

#[test]
fn grid_scroll_to_item_targets_the_row() {
    let mut grid = GridWindow::new(GridOptions::new(1_000, 3, 200).with_gap(16));
    grid.set_viewport(rect(800, 900));

    assert_eq!(
        grid.scroll_to_item(18, Align::Start, ScrollBehavior::Instant, 0),
        Some(1_296)
    );
    assert_eq!(grid.scroll_position(), 1_296);
    assert!(!grid.is_animating());

    // Item 19 shares the row, so the target does not move.
    assert_eq!(
        grid.scroll_to_item(19, Align::Start, ScrollBehavior::Instant, 16),
        Some(1_296)
    );
}

#[test]
fn grid_smooth_scroll_advances_across_ticks() {
    let mut grid = GridWindow::new(GridOptions::new(1_000, 3, 200).with_gap(16));
    grid.set_viewport(rect(800, 900));

    assert_eq!(
        grid.scroll_to_item(30, Align::Start, ScrollBehavior::Smooth, 0),
        Some(2_160)
    );
    assert_eq!(grid.scroll_position(), 0);
    assert!(grid.is_animating());

    let mid = grid.tick(80).unwrap();
    assert!(mid > 0 && mid < 2_160);
    assert!(grid.is_scrolling());
    let later = grid.tick(160).unwrap();
    assert!(later > mid);

    assert_eq!(grid.tick(240), Some(2_160));
    assert!(!grid.is_animating());
    assert!(!grid.is_scrolling());
    assert_eq!(grid.tick(260), None);
}

#[test]
fn grid_reduced_motion_downgrades_smooth_scrolls() {
    let options = GridOptions::new(1_000, 3, 200)
        .with_gap(16)
        .with_reduced_motion(true);
    let mut grid = GridWindow::new(options);
    grid.set_viewport(rect(800, 900));

    assert_eq!(
        grid.scroll_to_item(30, Align::Start, ScrollBehavior::Smooth, 0),
        Some(2_160)
    );
    assert_eq!(grid.scroll_position(), 2_160);
    assert!(!grid.is_animating());
}

#[test]
fn grid_resize_applies_after_the_burst_goes_quiet() {
    let mut grid = GridWindow::new(GridOptions::new(1_000, 3, 200).with_gap(16));
    grid.set_viewport(rect(800, 900));

    grid.on_resize(rect(600, 900), 0);
    grid.tick(100);
    assert_eq!(grid.viewport().main, 800);

    // A later observation restarts the debounce window.
    grid.on_resize(rect(500, 900), 100);
    grid.tick(250);
    assert_eq!(grid.viewport().main, 800);
    grid.tick(300);
    assert_eq!(grid.viewport().main, 500);
}

#[test]
fn grid_range_callback_fires_only_on_change() {
    let changes = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&changes);
    let options = GridOptions::new(1_000, 3, 200)
        .with_gap(16)
        .with_on_visible_range_change(Arc::new(move |_, _| {
            seen.fetch_add(1, Ordering::Relaxed);
        }));
    let mut grid = GridWindow::new(options);
    assert_eq!(changes.load(Ordering::Relaxed), 0);

    grid.set_viewport(rect(800, 900));
    assert_eq!(changes.load(Ordering::Relaxed), 1);

    // A tiny scroll keeps the same rows.
    grid.on_scroll_event(10, 0);
    grid.tick(16);
    assert_eq!(changes.load(Ordering::Relaxed), 1);

    grid.on_scroll_event(2_000, 20);
    grid.tick(32);
    assert_eq!(changes.load(Ordering::Relaxed), 2);
}

#[test]
fn grid_scroll_callback_sees_coalesced_offsets() {
    let fires = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(AtomicU64::new(u64::MAX));
    let fires_seen = Arc::clone(&fires);
    let last_seen = Arc::clone(&last);
    let options = GridOptions::new(1_000, 3, 200)
        .with_gap(16)
        .with_on_scroll(Arc::new(move |offset| {
            fires_seen.fetch_add(1, Ordering::Relaxed);
            last_seen.store(offset, Ordering::Relaxed);
        }));
    let mut grid = GridWindow::new(options);
    grid.set_viewport(rect(800, 900));

    grid.on_scroll_event(100, 0);
    grid.on_scroll_event(200, 5);
    grid.on_scroll_event(300, 10);
    assert_eq!(fires.load(Ordering::Relaxed), 0);

    grid.tick(16);
    assert_eq!(fires.load(Ordering::Relaxed), 1);
    assert_eq!(last.load(Ordering::Relaxed), 300);
}

#[test]
fn grid_handles_zero_columns() {
    let mut grid = GridWindow::new(GridOptions::new(10, 0, 100));
    grid.set_viewport(rect(800, 900));

    assert_eq!(grid.row_count(), 0);
    assert_eq!(grid.total_size(), 0);
    assert_eq!(grid.column_width(), 0.0);
    assert!(grid.visible_range().is_empty());
    assert_eq!(
        grid.scroll_to_item(3, Align::Start, ScrollBehavior::Instant, 0),
        None
    );
}

#[test]
fn grid_set_columns_reclamps_the_offset() {
    let mut grid = GridWindow::new(GridOptions::new(100, 1, 100));
    grid.set_viewport(rect(100, 100));
    grid.scroll_by(20_000, 0);
    assert_eq!(grid.scroll_position(), 9_900);

    grid.set_columns(10);
    assert_eq!(grid.total_size(), 1_000);
    assert_eq!(grid.scroll_position(), 900);
}

#[test]
fn grid_unmount_silences_the_window() {
    let mut grid = GridWindow::new(GridOptions::new(100, 4, 50));
    grid.set_viewport(rect(400, 400));
    grid.on_scroll_event(100, 0);
    grid.tick(16);

    grid.unmount();
    assert!(!grid.is_mounted());
    assert!(!grid.on_scroll_event(500, 100));
    assert_eq!(grid.tick(116), None);
    assert!(!grid.is_scrolling());
}

// ------------------------------------------------------------- timeline

#[test]
fn timeline_inserts_markers_at_day_boundaries() {
    let day = 86_400_000i64;
    let mut timeline = TimelineWindow::new(TimelineOptions::new(80).with_gap(16));
    timeline.set_events([10, 20, day + 5]);

    assert_eq!(timeline.event_count(), 3);
    assert_eq!(timeline.total_size(), 312);
    assert_eq!(
        timeline.markers(),
        [
            DateMarker {
                day: 0,
                start: 0,
                first_index: 0
            },
            DateMarker {
                day: 1,
                start: 192,
                first_index: 2
            },
        ]
    );
}

#[test]
fn timeline_packs_events_without_markers() {
    let options = TimelineOptions::new(80).with_gap(16).with_show_markers(false);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([10, 20, 86_400_005]);
    timeline.set_viewport(rect(400, 300));

    assert_eq!(timeline.total_size(), 272);
    assert!(timeline.markers().is_empty());

    let mut slots = Vec::new();
    timeline.for_each_visible_event(|slot| slots.push((slot.index, slot.start)));
    assert_eq!(slots, vec![(0, 0), (1, 96), (2, 192)]);
}

#[test]
fn timeline_sorts_events_and_keeps_ties_stable() {
    let options = TimelineOptions::new(100).with_show_markers(false);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([5_000, 1_000, 1_000, 3_000]);

    assert_eq!(timeline.timestamp(0), Some(1_000));
    assert_eq!(timeline.source_index(0), Some(1));
    assert_eq!(timeline.source_index(1), Some(2));
    assert_eq!(timeline.timestamp(2), Some(3_000));
    assert_eq!(timeline.timestamp(3), Some(5_000));
}

#[test]
fn timeline_offset_inside_a_marker_resolves_to_the_next_event() {
    let options = TimelineOptions::new(80).with_gap(16).with_overscan(0);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([10, 20, 86_400_005]);
    timeline.set_viewport(rect(100, 0));

    // 200 sits inside the day marker at 192..232.
    timeline.on_scroll_event(200, 0);
    timeline.tick(16);
    let range = timeline.visible_range();
    assert_eq!((range.start_index, range.end_index), (2, 3));
    assert_eq!(range.start_offset, 232);
}

#[test]
fn timeline_visible_markers_track_the_range() {
    let options = TimelineOptions::new(80).with_gap(16).with_overscan(0);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([10, 20, 86_400_005]);
    timeline.set_viewport(rect(100, 0));

    let mut days = Vec::new();
    timeline.for_each_visible_marker(|m| days.push(m.day));
    assert_eq!(days, vec![0]);

    timeline.on_scroll_event(200, 0);
    timeline.tick(16);
    let mut days = Vec::new();
    timeline.for_each_visible_marker(|m| days.push(m.day));
    assert_eq!(days, vec![1]);
}

#[test]
fn timeline_scroll_to_date_picks_the_nearest_event() {
    let options = TimelineOptions::new(100).with_show_markers(false);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([0, 1_000, 2_000]);
    timeline.set_viewport(rect(100, 0));

    assert_eq!(
        timeline.scroll_to_date(1_400, Align::Start, ScrollBehavior::Instant, 0),
        Some(100)
    );
    assert_eq!(timeline.scroll_position(), 100);

    // An exact tie prefers the earlier event.
    assert_eq!(
        timeline.scroll_to_date(1_500, Align::Start, ScrollBehavior::Instant, 16),
        Some(100)
    );

    assert_eq!(timeline.nearest_event(-50), Some(0));
    assert_eq!(timeline.nearest_event(99_999), Some(2));
}

#[test]
fn timeline_anchor_survives_a_prepend() {
    let options = TimelineOptions::new(100).with_show_markers(false);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([1_000, 2_000, 3_000]);
    timeline.set_viewport(rect(100, 0));
    timeline.on_scroll_event(150, 0);
    timeline.tick(16);

    let anchor = timeline.capture_anchor().unwrap();
    assert_eq!(anchor.index, 1);
    assert_eq!(anchor.offset_into_item, 50);

    timeline.set_events([400, 500, 1_000, 2_000, 3_000]);
    assert_eq!(timeline.apply_anchor(&anchor, 2), Some(350));
    assert_eq!(timeline.scroll_position(), 350);
}

#[test]
fn timeline_set_events_clamps_the_offset() {
    let options = TimelineOptions::new(100).with_show_markers(false);
    let mut timeline = TimelineWindow::new(options);
    timeline.set_events([0, 100, 200, 300, 400, 500, 600, 700, 800, 900]);
    timeline.set_viewport(rect(100, 0));
    timeline.on_scroll_event(900, 0);
    timeline.tick(16);
    assert_eq!(timeline.scroll_position(), 900);

    timeline.set_events([0, 100, 200]);
    assert_eq!(timeline.scroll_position(), 200);
}

// ----------------------------------------------------------------- list

#[test]
fn list_measurement_above_the_viewport_shifts_the_offset() {
    let mut list = ListWindow::new(ListOptions::new(100, 10));
    list.set_viewport(rect(30, 0));
    list.on_scroll_event(200, 0);
    list.tick(16);

    assert_eq!(list.measure(0, 30), 20);
    assert_eq!(list.scroll_position(), 220);

    // An item below the viewport leaves the offset alone.
    assert_eq!(list.measure(50, 30), 0);
    assert_eq!(list.scroll_position(), 220);
    assert!(list.is_measured(50));
    assert_eq!(list.total_size(), 1_040);
}

#[test]
fn list_measurements_clamp_to_the_floor_and_ignore_jitter() {
    let options = ListOptions::new(4, 10).with_min_main(8).with_noise(3);
    let mut list = ListWindow::new(options);

    assert_eq!(list.measure(1, 3), 0);
    let pos = list.item_position(1).unwrap();
    assert_eq!(pos.size, 8);
    assert!(!pos.estimated);

    list.measure(1, 9); // within noise of the stored 8
    assert_eq!(list.item_position(1).unwrap().size, 8);

    list.measure(1, 12);
    assert_eq!(list.item_position(1).unwrap().size, 12);
    assert_eq!(list.total_size(), 42);
}

#[test]
fn list_adjustment_can_be_disabled() {
    let options = ListOptions::new(100, 10).with_adjust_on_measure(false);
    let mut list = ListWindow::new(options);
    list.set_viewport(rect(30, 0));
    list.on_scroll_event(200, 0);
    list.tick(16);

    assert_eq!(list.measure(0, 30), 0);
    assert_eq!(list.scroll_position(), 200);
    assert_eq!(list.item_position(0).unwrap().size, 30);
}

#[test]
fn list_count_changes_keep_in_range_measurements() {
    let mut list = ListWindow::new(ListOptions::new(10, 10));
    list.measure(2, 40);

    list.set_item_count(20);
    assert!(list.is_measured(2));
    assert_eq!(list.count(), 20);
    assert_eq!(list.total_size(), 230);

    list.set_item_count(2);
    assert!(!list.is_measured(2));
    assert_eq!(list.total_size(), 20);
}

#[test]
fn list_batched_measurements_accumulate_the_shift() {
    let mut list = ListWindow::new(ListOptions::new(100, 10));
    list.set_viewport(rect(30, 0));
    assert_eq!(
        list.scroll_to_item(50, Align::Start, ScrollBehavior::Instant, 0),
        Some(500)
    );

    // Two items above the viewport grow by 20 each; one below does not count.
    let shifted = list.measure_many([(0, 30), (1, 30), (60, 30)]);
    assert_eq!(shifted, 40);
    assert_eq!(list.scroll_position(), 540);

    list.reset_items();
    assert!(!list.is_measured(0));
    assert_eq!(list.total_size(), 1_000);
    assert_eq!(list.scroll_position(), 540);
}

// ----------------------------------------------------------- pagination

#[test]
fn pagination_triggers_near_the_end_and_rate_limits() {
    let mut pager = PaginationCoordinator::new(PaginationOptions::default());
    let mut triggers = Vec::new();
    let mut now = 0;
    while now < 1_000 {
        // 300 units of content remain below the viewport, inside the
        // 400-unit threshold.
        if pager.on_scroll(10_000, 8_900, 800, now) {
            triggers.push(now);
            pager.load_succeeded(true);
        }
        now += 50;
    }
    assert_eq!(triggers, vec![0, 500]);
}

#[test]
fn pagination_suppresses_triggers_while_loading() {
    let mut pager = PaginationCoordinator::new(PaginationOptions::default());
    assert!(!pager.on_scroll(10_000, 0, 800, 0)); // far from the end

    assert!(pager.on_scroll(10_000, 9_000, 800, 0));
    assert!(pager.is_loading());
    assert!(!pager.on_scroll(10_000, 9_100, 800, 16));
    assert!(!pager.on_sentinel_visible(16));

    pager.load_succeeded(true);
    assert_eq!(pager.state(), LoadState::Idle);
    assert!(!pager.on_sentinel_visible(400)); // within the minimum interval
    assert!(pager.on_sentinel_visible(500));
}

#[test]
fn pagination_failure_requires_a_manual_retry() {
    let mut pager = PaginationCoordinator::new(PaginationOptions::default());
    assert!(pager.on_sentinel_visible(0));
    pager.load_failed();
    assert_eq!(pager.state(), LoadState::Error);
    assert_eq!(pager.failed_attempts(), 1);

    // Scroll and sentinel triggers never leave the error state.
    assert!(!pager.on_scroll(10_000, 9_500, 800, 5_000));
    assert!(!pager.on_sentinel_visible(5_000));

    assert!(pager.retry(5_000));
    pager.load_failed();
    assert_eq!(pager.failed_attempts(), 2);

    // Retry is a deliberate action and skips the interval guard.
    assert!(pager.retry(5_100));
    pager.load_succeeded(true);
    assert_eq!(pager.failed_attempts(), 0);
    assert_eq!(pager.state(), LoadState::Idle);
}

#[test]
fn pagination_completes_and_can_reopen() {
    let mut pager = PaginationCoordinator::new(PaginationOptions::default());
    assert!(pager.on_sentinel_visible(0));
    pager.load_succeeded(false);
    assert_eq!(pager.state(), LoadState::Complete);
    assert!(!pager.has_more());
    assert!(!pager.on_scroll(10_000, 9_900, 800, 10_000));

    pager.set_has_more(true);
    assert_eq!(pager.state(), LoadState::Idle);
    assert!(pager.on_sentinel_visible(10_000));

    pager.load_succeeded(true);
    pager.set_has_more(false);
    assert_eq!(pager.state(), LoadState::Complete);
}

#[test]
fn pagination_reset_rearms_the_coordinator() {
    let mut pager = PaginationCoordinator::new(PaginationOptions::default());
    assert!(pager.on_sentinel_visible(0));
    pager.load_failed();
    pager.reset();

    assert_eq!(pager.state(), LoadState::Idle);
    assert!(pager.has_more());
    assert_eq!(pager.failed_attempts(), 0);
    assert_eq!(pager.last_trigger_ms(), None);
    assert!(pager.on_sentinel_visible(0));
}

#[test]
fn pagination_honors_a_custom_threshold_and_interval() {
    let options = PaginationOptions::new()
        .with_threshold(100)
        .with_min_interval_ms(1_000)
        .with_has_more(true);
    let mut pager = PaginationCoordinator::new(options);

    assert!(!pager.on_scroll(10_000, 8_900, 800, 0)); // 300 > 100
    assert!(pager.on_scroll(10_000, 9_150, 800, 0)); // 50 <= 100
    pager.load_succeeded(true);
    assert!(!pager.on_scroll(10_000, 9_150, 800, 999));
    assert!(pager.on_scroll(10_000, 9_150, 800, 1_000));
}
