//! A headless windowing engine for rendering large scrollable collections.
//!
//! For concrete window types (grids, timelines, paginated lists), see the
//! `windower-views` crate.
//!
//! This crate focuses on the core math and state needed to render only the
//! on-screen slice of a massive collection at interactive frame rates:
//! per-item size caching with estimated fallbacks, cumulative position layout,
//! fast offset → index lookup, overscanned visible ranges, and a
//! frame-coalescing scroll tracker.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - viewport size (height/width)
//! - scroll offsets as the user scrolls
//! - item size estimates and (optionally) dynamic measurements
//! - monotonic `now_ms` timestamps (the engine owns no clocks or timers)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod provider;
mod range;
mod store;
mod tracker;
mod types;


pub use provider::{FixedLayout, PositionProvider};
pub use range::{DEFAULT_OVERSCAN, compute_visible_range, dynamic_overscan, scroll_target};
pub use store::SizeStore;
pub use tracker::ScrollTracker;
pub use types::{
    Align, ItemPosition, Rect, ScrollBehavior, ScrollDirection, ScrollState, VisibleRange,
};
