#![forbid(unsafe_code)]

//! Clip regions and ANSI-aware line clipping.
//!
//! Nested layout providers form a chain of clip regions; during a render
//! pass the chain is realized as a [`ClipStack`]. The effective clip
//! rectangle is the intersection of every rectangle on the stack and is a
//! function purely of those rectangles, never of render content. Overflow
//! is only unrestricted when every entry on the stack opts into it.
//!
//! [`ClipStack::clip_line`] cuts a single line of text (which may carry
//! embedded style-control sequences) to the effective region by display
//! column. Cuts land only on glyph boundaries: when a requested boundary
//! falls inside a double-width glyph, the glyph is replaced by spaces for
//! its in-range columns so neighboring cells stay aligned. If trailing
//! printable content is discarded, any trailing style-reset sequence from
//! the original line is re-appended so a truncated colored run cannot
//! bleed into cells written next on the same row.

use crate::ansi::{Segment, segments, trailing_reset, visible_width};
use smallvec::SmallVec;
use weft_core::Rect;

/// How a provider treats content outside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Content outside the rectangle is not rendered.
    #[default]
    Clip,
    /// Content may spill outside, as long as every enclosing provider
    /// also overflows.
    Overflow,
}

/// One provider's entry on the clip stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipEntry {
    /// The provider's clip rectangle in absolute coordinates.
    pub rect: Rect,
    /// The provider's overflow policy.
    pub mode: ClipMode,
}

/// The chain of clip regions for the currently rendering subtree.
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    entries: SmallVec<[ClipEntry; 4]>,
}

impl ClipStack {
    /// An empty stack: nothing is clipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a provider's region for the duration of its subtree render.
    pub fn push(&mut self, rect: Rect, mode: ClipMode) {
        self.entries.push(ClipEntry { rect, mode });
    }

    /// Pop the most recently pushed region.
    pub fn pop(&mut self) {
        self.entries.pop();
    }

    /// Stack depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// True when every provider on the stack permits overflow (vacuously
    /// true for an empty stack).
    pub fn allows_overflow(&self) -> bool {
        self.entries.iter().all(|e| e.mode == ClipMode::Overflow)
    }

    /// The intersection of every rectangle on the stack.
    ///
    /// `None` when the stack is empty (unclipped). Non-overlapping
    /// entries intersect to an empty rect, never a negative one.
    pub fn effective_rect(&self) -> Option<Rect> {
        let mut iter = self.entries.iter();
        let first = iter.next()?;
        let mut acc = first.rect;
        for entry in iter {
            acc = acc.intersection(&entry.rect);
        }
        Some(acc)
    }

    /// Whether a cell at absolute (x, y) may be rendered.
    pub fn should_render_at(&self, x: u16, y: u16) -> bool {
        if self.allows_overflow() {
            return true;
        }
        match self.effective_rect() {
            Some(rect) => rect.contains(x, y),
            None => true,
        }
    }

    /// Clip a line of text starting at absolute column `x`, row `y`.
    ///
    /// Returns the (possibly shifted) start column and the clipped text,
    /// or `None` when nothing survives. Control sequences preceding the
    /// visible slice are preserved so style state at the cut is correct.
    pub fn clip_line(&self, x: u16, y: u16, text: &str) -> Option<(u16, String)> {
        if self.allows_overflow() {
            return Some((x, text.to_owned()));
        }
        let clip = match self.effective_rect() {
            Some(rect) => rect,
            None => return Some((x, text.to_owned())),
        };
        if clip.is_empty() || y < clip.y || y >= clip.bottom() || x >= clip.right() {
            return None;
        }

        let visible = visible_width(text);
        let start_col = clip.x.saturating_sub(x);
        let end_col = visible.min(clip.right() - x);
        if end_col <= start_col {
            return None;
        }

        let mut out = String::with_capacity(text.len());
        let mut col: u16 = 0;
        for seg in segments(text) {
            match seg {
                Segment::Control(seq) => {
                    // Controls up to the cut survive; when nothing was
                    // cut on the right, trailing controls pass through
                    // whole so a fully visible colored run keeps its
                    // reset.
                    if col < end_col || end_col == visible {
                        out.push_str(seq);
                    }
                }
                Segment::Grapheme { cluster, width } => {
                    let g_start = col;
                    let g_end = col.saturating_add(width);
                    col = g_end;

                    if g_end <= start_col {
                        continue;
                    }
                    if g_start >= end_col {
                        break;
                    }
                    if g_start >= start_col && g_end <= end_col {
                        out.push_str(cluster);
                    } else {
                        // A cut lands inside this glyph: pad its in-range
                        // columns with spaces to preserve alignment.
                        let overlap = g_end.min(end_col) - g_start.max(start_col);
                        for _ in 0..overlap {
                            out.push(' ');
                        }
                    }
                }
            }
        }

        if end_col < visible
            && let Some(reset) = trailing_reset(text)
        {
            out.push_str(reset);
        }

        Some((x.saturating_add(start_col), out))
    }
}
