#![forbid(unsafe_code)]

//! Compositor kernel: cells, surfaces, layered composition, and
//! ANSI-aware clipping.

pub mod ansi;
pub mod cell;
pub mod clip;
pub mod composite;
pub mod surface;

mod text_width {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    #[inline]
    fn ascii_display_width(text: &str) -> usize {
        let mut width = 0;
        for b in text.bytes() {
            match b {
                b'\t' | b'\n' | b'\r' => width += 1,
                0x20..=0x7E => width += 1,
                _ => {}
            }
        }
        width
    }

    /// Display width of a single scalar in terminal columns.
    ///
    /// Control characters are zero-width except tab/newline/CR, which
    /// occupy one cell when written literally.
    #[inline]
    pub fn char_width(ch: char) -> usize {
        if ch.is_ascii() {
            return match ch {
                '\t' | '\n' | '\r' => 1,
                ' '..='~' => 1,
                _ => 0,
            };
        }
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }

    /// Display width of one grapheme cluster.
    #[inline]
    pub fn grapheme_width(grapheme: &str) -> usize {
        if grapheme.is_ascii() {
            return ascii_display_width(grapheme);
        }
        UnicodeWidthStr::width(grapheme)
    }

    /// Display width of a plain string (no embedded control sequences).
    #[inline]
    pub fn display_width(text: &str) -> usize {
        if text.is_ascii() {
            return ascii_display_width(text);
        }
        text.graphemes(true).map(grapheme_width).sum()
    }
}

pub use text_width::{char_width, display_width, grapheme_width};

#[cfg(test)]
mod tests {
    use super::{char_width, display_width, grapheme_width};

    #[test]
    fn ascii_widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('\x07'), 0);
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn wide_glyph_widths() {
        assert_eq!(char_width('日'), 2);
        assert_eq!(grapheme_width("日"), 2);
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn combining_marks_are_zero_width() {
        // e + combining acute renders as one column.
        assert_eq!(display_width("e\u{0301}"), 1);
    }
}
