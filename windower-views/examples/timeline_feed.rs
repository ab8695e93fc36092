use windower::{Align, Rect, ScrollBehavior};
use windower_views::{TimelineOptions, TimelineWindow};

const DAY: i64 = 86_400_000;

fn main() {
    // Three days of events, four per day, delivered newest-first. The
    // window sorts them ascending and lays out a marker per day boundary.
    let mut events = Vec::new();
    for day in 0..3i64 {
        for hour in [9, 12, 16, 21] {
            events.push(day * DAY + hour * 3_600_000);
        }
    }
    events.reverse();

    let mut timeline = TimelineWindow::new(TimelineOptions::new(80).with_gap(16));
    timeline.set_events(events.iter().copied());
    timeline.set_viewport(Rect {
        main: 400,
        cross: 320,
    });

    println!(
        "events={} total={}",
        timeline.event_count(),
        timeline.total_size()
    );
    for marker in timeline.markers() {
        println!(
            "  day {} starts at {} (first event {})",
            marker.day, marker.start, marker.first_index
        );
    }

    // Jump to the morning of day 2.
    timeline.scroll_to_date(
        2 * DAY + 10 * 3_600_000,
        Align::Start,
        ScrollBehavior::Instant,
        0,
    );
    println!("jumped to day 2: off={}", timeline.scroll_position());
    timeline.for_each_visible_event(|slot| {
        println!("  event {} ts={} at {}", slot.index, slot.timestamp, slot.start);
    });

    // Load two older days and keep the reading position steady.
    let anchor = timeline.capture_anchor().expect("events are not empty");
    let mut older = Vec::new();
    for day in -2..0i64 {
        for hour in [10, 14] {
            older.push(day * DAY + hour * 3_600_000);
        }
    }
    let prepended = older.len();
    older.extend(events.iter().copied());
    timeline.set_events(older);
    timeline.apply_anchor(&anchor, prepended);
    println!(
        "after prepending {prepended}: off={} anchor={anchor:?}",
        timeline.scroll_position()
    );
}
