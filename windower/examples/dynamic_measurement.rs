use windower::{PositionProvider, SizeStore, compute_visible_range};

fn main() {
    // 10k feed items assumed 120 units tall until measured.
    let mut store = SizeStore::new(10_000, 120);
    println!("estimated total={}", store.total_size());

    let before = compute_visible_range(&mut store, 6_000, 900, 3);
    println!("range before measurements={before:?}");

    // The first screens render and report their real sizes.
    let accepted = store.measure_many((0..60usize).map(|i| (i, if i % 3 == 0 { 180 } else { 96 })));
    println!("accepted={accepted} measured_len={}", store.measured_len());

    let after = compute_visible_range(&mut store, 6_000, 900, 3);
    println!("range after measurements={after:?}");
    println!("item 0 position={:?}", store.position(0));
    println!("index at offset 6000 -> {}", store.index_at_offset(6_000));
    println!("new total={}", store.total_size());
}
