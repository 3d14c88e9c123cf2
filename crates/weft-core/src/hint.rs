#![forbid(unsafe_code)]

//! Slot sizing: [`SizeHint`] and the one-dimensional resolver.
//!
//! A layout parent sizes its slots (stack children, grid columns/rows)
//! along one axis at a time. Each slot carries a [`SizeHint`]; the
//! resolver turns hints plus an available extent into concrete sizes:
//!
//! 1. `Fixed(v)` slots reserve exactly `v` cells.
//! 2. `Content` slots reserve the widest measured occupant of that slot.
//! 3. `Fill(weight)` slots split whatever remains proportionally, using
//!    integer division. The rounding shortfall (strictly less than the
//!    total weight) is left undistributed.
//!
//! The same resolver runs per axis for the two-dimensional grid, so
//! stacks and grids cannot disagree about slot sizing.

/// Per-slot sizing policy along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeHint {
    /// An exact size in cells.
    Fixed(u16),
    /// Size to the measured extent of the slot's content.
    #[default]
    Content,
    /// Split remaining space proportionally by weight.
    Fill(u16),
}

impl SizeHint {
    /// Fill with weight 1.
    pub const FILL: Self = Self::Fill(1);
}

/// Resolve concrete sizes for `hints.len()` slots along one axis.
///
/// `content_size(slot)` must return the measured extent of the widest
/// non-spanning occupant of `slot`; it is consulted only for `Content`
/// slots. `available` is the parent's extent along the axis.
///
/// The sum of resolved `Fill` sizes never exceeds the remaining space,
/// and the shortfall from integer division is strictly less than the
/// total fill weight.
pub fn resolve_axis(
    hints: &[SizeHint],
    mut content_size: impl FnMut(usize) -> u16,
    available: u16,
) -> Vec<u16> {
    let mut sizes = vec![0u16; hints.len()];
    let mut total_fixed: u32 = 0;
    let mut total_weight: u32 = 0;

    for (slot, hint) in hints.iter().enumerate() {
        match *hint {
            SizeHint::Fixed(v) => {
                sizes[slot] = v;
                total_fixed += v as u32;
            }
            SizeHint::Content => {
                let measured = content_size(slot);
                sizes[slot] = measured;
                total_fixed += measured as u32;
            }
            SizeHint::Fill(weight) => {
                total_weight += weight as u32;
            }
        }
    }

    if total_weight == 0 {
        return sizes;
    }

    let remaining = (available as u32).saturating_sub(total_fixed);
    for (slot, hint) in hints.iter().enumerate() {
        if let SizeHint::Fill(weight) = *hint {
            // Integer division: the distributed total may fall short of
            // `remaining` by a rounding remainder. Accepted, not corrected.
            sizes[slot] = (remaining * weight as u32 / total_weight).min(u16::MAX as u32) as u16;
        }
    }

    sizes
}

/// Cumulative offsets for a run of slot sizes.
///
/// Returns `sizes.len() + 1` entries; `offsets[i]` is where slot `i`
/// starts and `offsets[sizes.len()]` is the total extent. Saturates
/// rather than overflowing.
pub fn offsets(sizes: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(sizes.len() + 1);
    let mut acc: u16 = 0;
    out.push(0);
    for &size in sizes {
        acc = acc.saturating_add(size);
        out.push(acc);
    }
    out
}

/// Placement of content inside a larger extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to the start (left/top).
    #[default]
    Start,
    /// Center within available space.
    Center,
    /// Align to the end (right/bottom).
    End,
}

impl Alignment {
    /// Offset of `size` inside `available`.
    ///
    /// Clamps to zero when the content is larger than the space.
    #[inline]
    pub const fn offset(self, available: u16, size: u16) -> u16 {
        let slack = available.saturating_sub(size);
        match self {
            Alignment::Start => 0,
            Alignment::Center => slack / 2,
            Alignment::End => slack,
        }
    }
}
