use alloc::vec::Vec;

use crate::provider::PositionProvider;
use crate::types::ItemPosition;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
type SizeMap = HashMap<usize, u32>;
#[cfg(not(feature = "std"))]
type SizeMap = BTreeMap<usize, u32>;

/// A per-item size cache with an estimated fallback and lazily rebuilt
/// cumulative positions.
///
/// Items for which no measurement has been reported use the configured
/// estimate, so layout math works before anything has rendered. Reported
/// measurements overwrite the estimate and only invalidate the cached
/// positions; the rebuild happens on the next read, so a burst of
/// measurements between two reads costs a single O(n) pass.
///
/// A store is exclusively owned by one window instance. It never shares
/// measurements across windows.
#[derive(Clone, Debug)]
pub struct SizeStore {
    count: usize,
    estimate: u32,
    min_size: u32,
    noise: u32,
    measured: SizeMap,
    positions: Vec<ItemPosition>,
    total: u64,
    dirty: bool,
}

impl SizeStore {
    /// Creates a store for `count` items, all initially reported at
    /// `estimated_size`.
    pub fn new(count: usize, estimated_size: u32) -> Self {
        wdebug!(count, estimated_size, "SizeStore::new");
        Self {
            count,
            estimate: estimated_size,
            min_size: 1,
            noise: 1,
            measured: SizeMap::new(),
            positions: Vec::new(),
            total: 0,
            dirty: true,
        }
    }

    /// Sets the measurement floor. Measurements below it are clamped up.
    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size.max(1);
        self
    }

    /// Sets the measurement-noise threshold.
    ///
    /// A re-measurement whose delta against the current size is smaller than
    /// `noise` is ignored, so rounding jitter from the host's layout engine
    /// does not churn positions. The default of 1 ignores exact repeats only.
    pub fn with_noise(mut self, noise: u32) -> Self {
        self.noise = noise.max(1);
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn estimate(&self) -> u32 {
        self.estimate
    }

    /// Returns the size for `index`: the measured value if one was accepted,
    /// otherwise the estimate. Never fails; out-of-range indexes also report
    /// the estimate.
    pub fn get_size(&self, index: usize) -> u32 {
        self.measured.get(&index).copied().unwrap_or(self.estimate)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.contains_key(&index)
    }

    /// Returns the number of cached measurements.
    pub fn measured_len(&self) -> usize {
        self.measured.len()
    }

    /// Records a measured size for `index`.
    ///
    /// Invalid input is rejected in place: out-of-range indexes and zero
    /// sizes return `false` and leave the store untouched. Accepted values
    /// are clamped to the measurement floor. Re-measurements within the
    /// noise threshold of the current size are ignored.
    ///
    /// Accepting a measurement marks the position cache dirty without
    /// rebuilding it; positions are rebuilt on the next read.
    pub fn set_size(&mut self, index: usize, size: u32) -> bool {
        if index >= self.count {
            wwarn!(index, count = self.count, "set_size: index out of range");
            return false;
        }
        if size == 0 {
            wwarn!(index, "set_size: zero size rejected");
            return false;
        }
        let size = size.max(self.min_size);
        if let Some(&cur) = self.measured.get(&index) {
            if cur.abs_diff(size) < self.noise {
                return false;
            }
        }
        wtrace!(index, size, "set_size");
        self.measured.insert(index, size);
        self.dirty = true;
        true
    }

    /// Records a batch of measurements. Returns how many were accepted.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) -> usize {
        let mut accepted = 0usize;
        for (index, size) in measurements {
            if self.set_size(index, size) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Returns the position of `index`, or `None` when out of range.
    ///
    /// Rebuilds the position cache first if any measurement was accepted
    /// since the last read.
    pub fn position(&mut self, index: usize) -> Option<ItemPosition> {
        if index >= self.count {
            return None;
        }
        self.ensure_clean();
        self.positions.get(index).copied()
    }

    /// Returns the total size of all items.
    ///
    /// The total is carried by the position cache; it is never re-summed per
    /// call.
    pub fn total_size(&mut self) -> u64 {
        self.ensure_clean();
        self.total
    }

    /// Grows or shrinks the store while preserving measurements that remain
    /// in range. Measurements at `index >= count` are discarded.
    pub fn set_count(&mut self, count: usize) {
        if self.count == count {
            return;
        }
        wdebug!(prev = self.count, count, "SizeStore::set_count");
        if count < self.count {
            self.measured.retain(|&index, _| index < count);
        }
        self.count = count;
        self.dirty = true;
    }

    /// Drops every measurement; all items revert to the estimate.
    pub fn reset(&mut self) {
        wdebug!(count = self.count, "SizeStore::reset");
        self.measured.clear();
        self.dirty = true;
    }

    /// Replaces the estimated size used for unmeasured items.
    pub fn set_estimate(&mut self, estimated_size: u32) {
        if self.estimate == estimated_size {
            return;
        }
        self.estimate = estimated_size;
        self.dirty = true;
    }

    /// Forces a full position rebuild now instead of on the next read.
    pub fn recalculate_positions(&mut self) {
        self.dirty = true;
        self.ensure_clean();
    }

    fn ensure_clean(&mut self) {
        if !self.dirty {
            return;
        }
        wtrace!(
            count = self.count,
            measured = self.measured.len(),
            "rebuild_positions"
        );
        self.positions.clear();
        self.positions.reserve_exact(self.count);
        let mut cursor = 0u64;
        for i in 0..self.count {
            let measured = self.measured.get(&i).copied();
            let size = measured.unwrap_or(self.estimate);
            self.positions.push(ItemPosition {
                start: cursor,
                size,
                estimated: measured.is_none(),
            });
            cursor = cursor.saturating_add(size as u64);
        }
        self.total = cursor;
        self.dirty = false;
    }
}

impl PositionProvider for SizeStore {
    fn len(&self) -> usize {
        self.count
    }

    fn position(&mut self, index: usize) -> Option<ItemPosition> {
        SizeStore::position(self, index)
    }

    fn total_size(&mut self) -> u64 {
        SizeStore::total_size(self)
    }

    fn index_at_offset(&mut self, offset: u64) -> usize {
        self.ensure_clean();
        if self.positions.is_empty() {
            return 0;
        }
        let i = self.positions.partition_point(|p| p.end() <= offset);
        i.min(self.positions.len() - 1)
    }
}
