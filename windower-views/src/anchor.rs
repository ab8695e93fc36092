use windower::PositionProvider;

/// A stable reading position captured before a data mutation.
///
/// The anchor remembers which item sat under the top of the viewport and
/// how far the viewport had scrolled into it. After items are prepended
/// the same item lives at a shifted index; [`anchor_offset`] resolves the
/// scroll offset that puts it back where it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    /// Index of the anchored item at capture time.
    pub index: usize,
    /// How far the viewport top had scrolled into the anchored item.
    pub offset_into_item: u64,
}

/// Captures the item under the viewport top as an anchor.
///
/// Returns `None` when the collection is empty.
pub fn capture_anchor<P>(provider: &mut P, scroll_offset: u64) -> Option<ScrollAnchor>
where
    P: PositionProvider + ?Sized,
{
    if provider.is_empty() {
        return None;
    }
    let index = provider.index_at_offset(scroll_offset);
    let pos = provider.position(index)?;
    Some(ScrollAnchor {
        index,
        offset_into_item: scroll_offset.saturating_sub(pos.start),
    })
}

/// Resolves the scroll offset that restores `anchor` after `prepended`
/// items were inserted in front of it.
///
/// Returns `None` when the shifted index no longer exists. The caller
/// still clamps the result to the scrollable extent.
pub fn anchor_offset<P>(provider: &mut P, anchor: &ScrollAnchor, prepended: usize) -> Option<u64>
where
    P: PositionProvider + ?Sized,
{
    let index = anchor.index.checked_add(prepended)?;
    let pos = provider.position(index)?;
    Some(pos.start.saturating_add(anchor.offset_into_item))
}
