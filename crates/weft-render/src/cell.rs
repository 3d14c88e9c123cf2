#![forbid(unsafe_code)]

//! Cell types and invariants.
//!
//! The [`Cell`] is the fundamental unit of a [`Surface`] grid: a glyph,
//! optional foreground/background color, and style attributes, packed
//! small enough that whole-grid scans stay cache-friendly.
//!
//! Two cell states are special:
//!
//! - **unwritten** ([`CellContent::EMPTY`]): never painted, treated as
//!   transparent by composition and skipped by emitters.
//! - **continuation** ([`CellContent::CONTINUATION`]): the second column
//!   of a double-width glyph. Not independently paintable; it is owned by
//!   the head cell to its left.
//!
//! [`Surface`]: crate::surface::Surface

use crate::char_width;

/// Cell content: a direct Unicode scalar or one of two sentinel states.
///
/// # Encoding (4 bytes)
///
/// - `0x0`: empty (unwritten)
/// - `0x7FFF_FFFF`: continuation marker (outside valid scalar range)
/// - otherwise: the Unicode scalar value
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CellContent(u32);

impl CellContent {
    /// Empty cell content (never painted).
    pub const EMPTY: Self = Self(0);

    /// Continuation marker for the trailing column of a wide glyph.
    ///
    /// Value is `0x7FFF_FFFF`, outside valid Unicode scalar range
    /// (0..=0x10FFFF), so it can never collide with a real glyph.
    pub const CONTINUATION: Self = Self(0x7FFF_FFFF);

    /// Create content from a single Unicode character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    /// Check if this is a continuation cell.
    #[inline]
    pub const fn is_continuation(self) -> bool {
        self.0 == Self::CONTINUATION.0
    }

    /// Check if this cell is unwritten.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Extract the character, if this holds one.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.0 == Self::EMPTY.0 || self.0 == Self::CONTINUATION.0 {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Display width of this content in columns.
    ///
    /// Empty and continuation cells have width 0.
    #[inline]
    pub fn width(self) -> usize {
        match self.as_char() {
            Some(c) => char_width(c),
            None => 0,
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl core::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            write!(f, "CellContent::EMPTY")
        } else if self.is_continuation() {
            write!(f, "CellContent::CONTINUATION")
        } else if let Some(c) = self.as_char() {
            write!(f, "CellContent::Char({c:?})")
        } else {
            write!(f, "CellContent(0x{:08x})", self.0)
        }
    }
}

/// A compact RGBA color, `0xRRGGBBAA`.
///
/// `TRANSPARENT` (all zero) doubles as "no color set": a cell written
/// with a transparent foreground or background inherits whatever the
/// emitter's ambient color is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent / no color set.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Check whether this is the "no color set" sentinel.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }
}

bitflags::bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE     = 0b0000_1000;
        /// Blinking text.
        const BLINK         = 0b0001_0000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0010_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0100_0000;
        /// Hidden / invisible text.
        const HIDDEN        = 0b1000_0000;
    }
}

/// A single surface cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph content.
    pub content: CellContent,
    /// Foreground color; `TRANSPARENT` means unset.
    pub fg: PackedRgba,
    /// Background color; `TRANSPARENT` means unset.
    pub bg: PackedRgba,
    /// Style flags.
    pub attrs: StyleFlags,
}

impl Cell {
    /// A continuation cell (placeholder owned by the wide glyph to its left).
    pub const CONTINUATION: Self = Self {
        content: CellContent::CONTINUATION,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        attrs: StyleFlags::empty(),
    };

    /// Create a new cell with the given content and no colors.
    #[inline]
    pub const fn new(content: CellContent) -> Self {
        Self {
            content,
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }

    /// Create a cell from a single character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(CellContent::from_char(c))
    }

    /// Check if this is a continuation cell.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.content.is_continuation()
    }

    /// Check if this cell is unwritten.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Display width of this cell's glyph.
    #[inline]
    pub fn width(&self) -> usize {
        self.content.width()
    }

    /// Set the foreground color.
    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[inline]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    /// Set the style flags.
    #[inline]
    pub const fn with_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(CellContent::EMPTY)
    }
}
