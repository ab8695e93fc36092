use windower::Rect;
use windower_views::{ListOptions, ListWindow, PaginationCoordinator, PaginationOptions};

fn main() {
    // A feed that grows by 50 items per page, estimated at 120 units each.
    let mut list = ListWindow::new(ListOptions::new(50, 120));
    let mut pager = PaginationCoordinator::new(PaginationOptions::new().with_threshold(600));
    list.set_viewport(Rect {
        main: 900,
        cross: 600,
    });

    let mut now_ms = 0u64;
    let mut offset = 0u64;
    let mut pages = 1usize;
    while pages < 4 {
        now_ms += 16;
        offset += 150; // a fast fling toward the end
        list.on_scroll_event(offset, now_ms);
        list.tick(now_ms);

        let total = list.total_size();
        if pager.on_scroll(total, list.scroll_position(), 900, now_ms) {
            println!(
                "t={now_ms} page {pages} requested (distance_to_end={})",
                list.distance_to_end()
            );
            // Pretend the response arrives instantly.
            pages += 1;
            list.set_item_count(pages * 50);
            pager.load_succeeded(pages < 4);
            println!("  -> count={} total={}", list.count(), list.total_size());
        }
    }
    println!("state={:?} has_more={}", pager.state(), pager.has_more());

    // Measured sizes refine the layout as items render.
    let shifted = list.measure_many((0..10usize).map(|i| (i, 90 + (i as u32 % 4) * 20)));
    println!("measure_many shifted={shifted} total={}", list.total_size());
}
