//! Concrete window types built on the `windower` crate.
//!
//! The `windower` crate is UI-agnostic and focuses on the core math and
//! state. This crate composes it into the window shapes a dashboard or feed
//! actually renders:
//!
//! - [`GridWindow`]: fixed-size cards in a fixed number of columns
//! - [`TimelineWindow`]: timestamp-sorted events with date-boundary markers
//! - [`ListWindow`]: dynamically measured rows (estimate first, measure on render)
//! - [`PaginationCoordinator`]: decides when the host should fetch more data
//!
//! Everything here is sans-IO: hosts push scroll/resize/intersection events
//! in and drive animation by calling `tick(now_ms)`; the engine owns no
//! clocks, timers, or framework objects.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod grid;
mod list;
mod pagination;
mod pane;
mod timeline;
mod tween;

#[cfg(test)]
mod tests;

pub use anchor::{ScrollAnchor, anchor_offset, capture_anchor};
pub use grid::{GridItem, GridOptions, GridWindow};
pub use list::{ListOptions, ListWindow};
pub use pagination::{LoadState, PaginationCoordinator, PaginationOptions};
pub use pane::{OnRangeChangeCallback, OnScrollCallback};
pub use timeline::{DateMarker, TimelineOptions, TimelineSlot, TimelineWindow};
pub use tween::{Easing, Tween};
