use crate::types::ItemPosition;

/// A source of item positions along the scroll axis.
///
/// The range calculator works against this trait so that fixed-size layouts
/// can answer offset lookups in O(1) arithmetic while measured layouts answer
/// them with a binary search, without any per-call branching on the layout
/// kind. The variant is selected where the provider is constructed.
///
/// Lookups take `&mut self` because measured providers may rebuild a lazy
/// position cache on first read.
pub trait PositionProvider {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the position of `index`, or `None` when out of range.
    fn position(&mut self, index: usize) -> Option<ItemPosition>;

    /// Returns the total size of the layout along the scroll axis.
    fn total_size(&mut self) -> u64;

    /// Returns the index of the item at `offset`, clamped to the last item
    /// for offsets at or past the end of the layout.
    ///
    /// Offsets that land between two items (inside a gap) may resolve to
    /// either neighbor; [`crate::compute_visible_range`] stays a superset of
    /// the visible items in both cases. The default implementation binary
    /// searches for the smallest index whose end is greater than `offset`.
    fn index_at_offset(&mut self, offset: u64) -> usize {
        let count = self.len();
        if count == 0 {
            return 0;
        }
        let mut lo = 0usize;
        let mut hi = count - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.position(mid) {
                Some(pos) if pos.end() <= offset => lo = mid + 1,
                Some(_) => hi = mid,
                None => return lo,
            }
        }
        lo
    }
}

/// A closed-form layout for items of one fixed size separated by a fixed gap.
///
/// There is no trailing gap after the last item. Offsets that land inside a
/// gap resolve to the item before the gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedLayout {
    count: usize,
    item_size: u32,
    gap: u32,
}

impl FixedLayout {
    pub fn new(count: usize, item_size: u32, gap: u32) -> Self {
        Self {
            count,
            item_size,
            gap,
        }
    }

    pub fn item_size(&self) -> u32 {
        self.item_size
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Item size plus gap: the distance between consecutive item starts.
    pub fn pitch(&self) -> u64 {
        self.item_size as u64 + self.gap as u64
    }
}

impl PositionProvider for FixedLayout {
    fn len(&self) -> usize {
        self.count
    }

    fn position(&mut self, index: usize) -> Option<ItemPosition> {
        if index >= self.count {
            return None;
        }
        Some(ItemPosition {
            start: index as u64 * self.pitch(),
            size: self.item_size,
            estimated: false,
        })
    }

    fn total_size(&mut self) -> u64 {
        if self.count == 0 || self.item_size == 0 {
            return 0;
        }
        (self.count as u64 * self.pitch()).saturating_sub(self.gap as u64)
    }

    fn index_at_offset(&mut self, offset: u64) -> usize {
        let pitch = self.pitch();
        if self.count == 0 || pitch == 0 {
            return 0;
        }
        ((offset / pitch) as usize).min(self.count - 1)
    }
}
