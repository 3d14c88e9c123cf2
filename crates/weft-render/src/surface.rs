#![forbid(unsafe_code)]

//! Surface grid storage.
//!
//! A [`Surface`] is a 2D grid of [`Cell`]s in row-major order
//! (`index = y * width + x`). Writes are wide-glyph atomic: a glyph of
//! display width 2 either lands as head + continuation or not at all, and
//! overwriting either half of a wide glyph clears the other half so a
//! half-glyph can never survive on screen.
//!
//! Zero-sized surfaces are legal and inert; a momentarily zero-sized
//! region is a normal transient layout state, not an error.

use crate::cell::{Cell, PackedRgba, StyleFlags};
use crate::grapheme_width;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;
use weft_core::Rect;

/// Reduce a grapheme cluster to the single scalar a cell stores.
///
/// Multi-scalar clusters are NFC-composed first, so a base letter plus
/// combining mark lands as its precomposed form. Clusters that stay
/// multi-scalar after composition (ZWJ emoji sequences) keep their
/// first scalar; the write cursor still advances by the full cluster
/// width.
fn cell_scalar(grapheme: &str) -> Option<char> {
    let mut chars = grapheme.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        return Some(first);
    }
    let mut composed = grapheme.nfc();
    let head = composed.next()?;
    if composed.next().is_none() {
        Some(head)
    } else {
        Some(first)
    }
}

/// A 2D grid of cells.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Surface {
    /// Create a new surface with the given dimensions.
    ///
    /// All cells start unwritten. Dimensions of zero are allowed; the
    /// resulting surface accepts and ignores all writes.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Surface width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Surface height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire surface.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Clear a wide glyph that overlaps (x, y) before an overwrite.
    ///
    /// Overwriting a head clears its continuation columns; overwriting a
    /// continuation walks left to the owning head and clears the whole
    /// glyph. Keeps the half-glyph invariant.
    fn cleanup_overlap(&mut self, x: u16, y: u16, new_cell: &Cell) {
        let Some(idx) = self.index(x, y) else { return };
        let current = self.cells[idx];

        if current.width() > 1 {
            let width = current.width();
            for i in 1..width {
                if let Some(tail_idx) = self.index(x + i as u16, y)
                    && self.cells[tail_idx].is_continuation()
                {
                    self.cells[tail_idx] = Cell::default();
                }
            }
        } else if current.is_continuation() && !new_cell.is_continuation() {
            let mut back_x = x;
            while back_x > 0 {
                back_x -= 1;
                if let Some(h_idx) = self.index(back_x, y) {
                    let h_cell = self.cells[h_idx];
                    if !h_cell.is_continuation() {
                        let width = h_cell.width();
                        if (back_x as usize + width) > x as usize {
                            // This head owns the cell being overwritten.
                            self.cells[h_idx] = Cell::default();
                            for i in 1..width {
                                if let Some(tail_idx) = self.index(back_x + i as u16, y)
                                    && self.cells[tail_idx].is_continuation()
                                {
                                    self.cells[tail_idx] = Cell::default();
                                }
                            }
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Set the cell at (x, y).
    ///
    /// - Does nothing if coordinates are out of bounds.
    /// - Automatically writes continuation cells for wide glyphs.
    /// - Atomic wide writes: if a wide glyph does not fully fit within
    ///   bounds, nothing is written.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.width();

        if width <= 1 {
            let Some(idx) = self.index(x, y) else { return };
            self.cleanup_overlap(x, y, &cell);
            self.cells[idx] = cell;
            return;
        }

        // Multi-width atomicity: all columns must be in bounds.
        for i in 0..width {
            let cx = x.saturating_add(i as u16);
            if cx >= self.width || y >= self.height {
                return;
            }
        }

        self.cleanup_overlap(x, y, &cell);
        for i in 1..width {
            self.cleanup_overlap(x + i as u16, y, &Cell::CONTINUATION);
        }

        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
        for i in 1..width {
            if let Some(idx) = self.index(x + i as u16, y) {
                self.cells[idx] = Cell::CONTINUATION;
            }
        }
    }

    /// Write a line of text starting at (x, y), walking grapheme clusters.
    ///
    /// Returns the x position after the last written glyph. Glyphs that
    /// would extend past the right edge are dropped whole (atomicity).
    /// Zero-width clusters are skipped.
    pub fn write_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: PackedRgba,
        bg: PackedRgba,
        attrs: StyleFlags,
    ) -> u16 {
        let mut cx = x;
        for grapheme in text.graphemes(true) {
            let w = grapheme_width(grapheme);
            if w == 0 {
                continue;
            }
            if cx as usize + w > self.width as usize {
                break;
            }
            if let Some(c) = cell_scalar(grapheme) {
                let cell = Cell::from_char(c).with_fg(fg).with_bg(bg).with_attrs(attrs);
                self.set(cx, y, cell);
            }
            cx = cx.saturating_add(w as u16);
        }
        cx
    }

    /// Fill a rectangular region with the given cell.
    ///
    /// The region is clipped to the surface bounds.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.bounds().intersection(&rect);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset all cells to unwritten.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Raw access to the cell slice, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Composite another surface into this one at (dst_x, dst_y).
    ///
    /// Unwritten and continuation cells in the source are skipped, so the
    /// destination shows through; continuation columns are re-established
    /// by the wide-glyph head writes. Only destination cells inside
    /// `clip` (destination coordinates) are touched.
    pub fn composite_from(&mut self, src: &Surface, dst_x: u16, dst_y: u16, clip: Rect) {
        let clip = self.bounds().intersection(&clip);
        if clip.is_empty() {
            return;
        }
        for sy in 0..src.height {
            let dy = dst_y.saturating_add(sy);
            if dy < clip.y || dy >= clip.bottom() {
                continue;
            }
            for sx in 0..src.width {
                let cell = match src.get(sx, sy) {
                    Some(c) => *c,
                    None => continue,
                };
                if cell.is_empty() || cell.is_continuation() {
                    continue;
                }
                let dx = dst_x.saturating_add(sx);
                let w = cell.width().max(1) as u16;
                // Wide glyphs must land entirely inside the clip.
                if dx < clip.x || dx.saturating_add(w) > clip.right() {
                    continue;
                }
                self.set(dx, dy, cell);
            }
        }
    }

    /// Check if two surfaces have identical content.
    pub fn content_eq(&self, other: &Surface) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for Surface {}
