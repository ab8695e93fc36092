use windower::{Align, FixedLayout, PositionProvider, compute_visible_range, scroll_target};

fn main() {
    // 334 rows of 200 units with a 16-unit gap, a card grid collapsed to
    // row space.
    let mut layout = FixedLayout::new(334, 200, 16);
    println!("total_size={}", layout.total_size());

    let range = compute_visible_range(&mut layout, 2_000, 800, 3);
    println!("visible_range={range:?}");

    let target = scroll_target(&mut layout, 120, Align::Center, 800, 2_000);
    println!("scroll to row 120 centered: target={target}");

    // Overscrolled offsets clamp to the last row.
    let clamped = compute_visible_range(&mut layout, u64::MAX, 800, 3);
    println!("overscrolled range={clamped:?}");
}
