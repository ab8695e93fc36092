use windower::{Align, Rect, ScrollBehavior};
use windower_views::{GridOptions, GridWindow};

fn main() {
    // A three-column card wall: 1000 cards, 200-unit rows, 16-unit gaps.
    let mut grid = GridWindow::new(GridOptions::new(1_000, 3, 200).with_gap(16));
    grid.set_viewport(Rect {
        main: 800,
        cross: 900,
    });

    grid.on_scroll_event(2_000, 0);
    grid.tick(16);
    println!("column_width={:.2}", grid.column_width());
    println!("rows={:?}", grid.visible_rows());
    println!("items={:?}", grid.visible_range());
    grid.for_each_visible_item(|item| {
        if item.row == 9 {
            println!(
                "  card {} at row {} col {} start={} cross_start={:.2}",
                item.index, item.row, item.column, item.start, item.cross_start
            );
        }
    });

    // Smooth scroll to card 600, driving the tween from a frame loop.
    let target = grid
        .scroll_to_item(600, Align::Center, ScrollBehavior::Smooth, 16)
        .expect("grid is mounted");
    println!("target_offset={target}");

    let mut now_ms = 16u64;
    loop {
        now_ms += 16;
        if let Some(off) = grid.tick(now_ms) {
            if now_ms.is_multiple_of(80) {
                println!("t={now_ms} off={off} rows={:?}", grid.visible_rows());
            }
        } else {
            break;
        }
    }
    println!(
        "done: off={} rows={:?}",
        grid.scroll_position(),
        grid.visible_rows()
    );
}
