#![forbid(unsafe_code)]

//! Geometric primitives.

/// A width/height pair in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Size {
    /// Zero-area size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle for layout bounds, clip regions, and hit testing.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// The size of this rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> u16 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> u16 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap; the
    /// result never has negative extent.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    /// Create a new rectangle inside the current one with the given margin.
    pub fn inner(&self, margin: Sides) -> Rect {
        let x = self.x.saturating_add(margin.left);
        let y = self.y.saturating_add(margin.top);
        let width = self
            .width
            .saturating_sub(margin.left)
            .saturating_sub(margin.right);
        let height = self
            .height
            .saturating_sub(margin.top)
            .saturating_sub(margin.bottom);

        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: u16) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with horizontal values only.
    pub const fn horizontal(val: u16) -> Self {
        Self {
            top: 0,
            right: val,
            bottom: 0,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: u16) -> Self {
        Self {
            top: val,
            right: 0,
            bottom: val,
            left: 0,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<u16> for Sides {
    fn from(val: u16) -> Self {
        Self::all(val)
    }
}

impl From<(u16, u16)> for Sides {
    fn from((vertical, horizontal): (u16, u16)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// A min/max envelope for width and height, passed down during measurement.
///
/// Invariant: `min <= max` on each axis. `UNBOUNDED` (`u16::MAX`) marks an
/// axis with no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub min_width: u16,
    pub max_width: u16,
    pub min_height: u16,
    pub max_height: u16,
}

impl Constraints {
    /// Sentinel for an unbounded axis.
    pub const UNBOUNDED: u16 = u16::MAX;

    /// No minimum, no maximum on either axis.
    pub const NONE: Self = Self {
        min_width: 0,
        max_width: Self::UNBOUNDED,
        min_height: 0,
        max_height: Self::UNBOUNDED,
    };

    /// Loose constraints: zero minimum, the given maximum.
    #[inline]
    pub const fn loose(max_width: u16, max_height: u16) -> Self {
        Self {
            min_width: 0,
            max_width,
            min_height: 0,
            max_height,
        }
    }

    /// Tight constraints: minimum equals maximum equals `size`.
    #[inline]
    pub const fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    /// Clamp a size into the min/max envelope.
    #[inline]
    pub fn constrain(&self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }

    /// Check whether a size already satisfies this envelope.
    #[inline]
    pub fn is_satisfied_by(&self, size: Size) -> bool {
        self.constrain(size) == size
    }

    /// Shrink the envelope by fixed insets on all sides.
    ///
    /// Used by decorators that reserve border/padding space before
    /// measuring a child. Saturates at zero; an unbounded axis stays
    /// unbounded.
    pub fn deflate(&self, sides: Sides) -> Self {
        let h = sides.horizontal_sum();
        let v = sides.vertical_sum();
        let sub = |limit: u16, inset: u16| {
            if limit == Self::UNBOUNDED {
                Self::UNBOUNDED
            } else {
                limit.saturating_sub(inset)
            }
        };
        Self {
            min_width: self.min_width.saturating_sub(h),
            max_width: sub(self.max_width, h),
            min_height: self.min_height.saturating_sub(v),
            max_height: sub(self.max_height, v),
        }
    }

    /// Drop the minimums, keeping the maximums.
    ///
    /// Alignment decorators measure their child under loosened constraints
    /// to learn its natural size.
    #[inline]
    pub const fn loosen(&self) -> Self {
        Self {
            min_width: 0,
            max_width: self.max_width,
            min_height: 0,
            max_height: self.max_height,
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::{Constraints, Rect, Sides, Size};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.intersection(&b), Rect::default());
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn rect_intersection_adjacent_no_overlap() {
        // Rects share an edge but don't overlap (right edge is exclusive)
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn rect_union_basic() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(3, 3, 5, 5);
        assert_eq!(a.union(&b), Rect::new(0, 0, 8, 8));
    }

    #[test]
    fn rect_inner_reduces() {
        let rect = Rect::new(0, 0, 10, 10);
        let inner = rect.inner(Sides::new(1, 2, 3, 4));
        assert_eq!(inner, Rect::new(4, 1, 4, 6));
    }

    #[test]
    fn rect_inner_large_margin_clamps_to_zero() {
        let r = Rect::new(0, 0, 10, 10);
        let inner = r.inner(Sides::all(20));
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn rect_right_bottom_saturating() {
        let r = Rect::new(u16::MAX - 5, u16::MAX - 3, 100, 100);
        assert_eq!(r.right(), u16::MAX);
        assert_eq!(r.bottom(), u16::MAX);
    }

    #[test]
    fn rect_size_roundtrip() {
        let r = Rect::new(3, 4, 10, 20);
        assert_eq!(r.size(), Size::new(10, 20));
    }

    #[test]
    fn size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(0, 5).is_empty());
        assert!(Size::new(5, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn sides_sums() {
        let sides = Sides::new(1, 2, 3, 4);
        assert_eq!(sides.horizontal_sum(), 6);
        assert_eq!(sides.vertical_sum(), 4);
    }

    #[test]
    fn constraints_loose_and_tight() {
        let loose = Constraints::loose(10, 20);
        assert_eq!(loose.min_width, 0);
        assert_eq!(loose.max_width, 10);
        assert_eq!(loose.min_height, 0);
        assert_eq!(loose.max_height, 20);

        let tight = Constraints::tight(Size::new(7, 8));
        assert_eq!(tight.min_width, 7);
        assert_eq!(tight.max_width, 7);
        assert_eq!(tight.min_height, 8);
        assert_eq!(tight.max_height, 8);
    }

    #[test]
    fn constrain_clamps_both_axes() {
        let c = Constraints {
            min_width: 2,
            max_width: 10,
            min_height: 3,
            max_height: 6,
        };
        assert_eq!(c.constrain(Size::new(0, 0)), Size::new(2, 3));
        assert_eq!(c.constrain(Size::new(100, 100)), Size::new(10, 6));
        assert_eq!(c.constrain(Size::new(5, 5)), Size::new(5, 5));
    }

    #[test]
    fn constrain_satisfied_size_is_identity() {
        let c = Constraints::loose(50, 50);
        let s = Size::new(12, 34);
        assert!(c.is_satisfied_by(s));
        assert_eq!(c.constrain(s), s);
    }

    #[test]
    fn deflate_subtracts_insets() {
        let c = Constraints::loose(10, 10);
        let d = c.deflate(Sides::all(2));
        assert_eq!(d.max_width, 6);
        assert_eq!(d.max_height, 6);
        assert_eq!(d.min_width, 0);
    }

    #[test]
    fn deflate_keeps_unbounded_axes_unbounded() {
        let c = Constraints::NONE;
        let d = c.deflate(Sides::all(5));
        assert_eq!(d.max_width, Constraints::UNBOUNDED);
        assert_eq!(d.max_height, Constraints::UNBOUNDED);
    }

    #[test]
    fn deflate_saturates_at_zero() {
        let c = Constraints::loose(3, 3);
        let d = c.deflate(Sides::all(10));
        assert_eq!(d.max_width, 0);
        assert_eq!(d.max_height, 0);
    }

    #[test]
    fn loosen_drops_minimums() {
        let c = Constraints::tight(Size::new(8, 9));
        let l = c.loosen();
        assert_eq!(l.min_width, 0);
        assert_eq!(l.min_height, 0);
        assert_eq!(l.max_width, 8);
        assert_eq!(l.max_height, 9);
    }
}
