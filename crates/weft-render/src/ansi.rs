#![forbid(unsafe_code)]

//! ANSI escape sequence segmentation.
//!
//! Splits a single line into control sequences and grapheme clusters so
//! the clipper can measure and cut text by display column without ever
//! splitting a sequence. Handles:
//!
//! - CSI sequences: `ESC [` ... final byte (0x40-0x7E)
//! - OSC sequences: `ESC ]` ... BEL (0x07) or ST (`ESC \`)
//! - DCS/PM/APC sequences: `ESC P` / `ESC ^` / `ESC _` ... ST
//! - Two-character sequences: `ESC` + single byte

use crate::grapheme_width;
use memchr::memchr;
use unicode_segmentation::UnicodeSegmentation;

const ESC: u8 = 0x1B;

/// One segment of a line: either an embedded control sequence
/// (zero display columns) or a printable grapheme cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete escape sequence, contributing no columns.
    Control(&'a str),
    /// A grapheme cluster and its display width in columns.
    Grapheme { cluster: &'a str, width: u16 },
}

/// Iterator over the [`Segment`]s of a line.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

/// Segment a line into control sequences and grapheme clusters.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let bytes = self.text.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        if bytes[self.pos] == ESC {
            let end = skip_escape_sequence(bytes, self.pos);
            let seq = &self.text[self.pos..end];
            self.pos = end;
            return Some(Segment::Control(seq));
        }

        // Plain run up to the next ESC; ESC is single-byte ASCII, so the
        // slice boundary can never fall inside a UTF-8 sequence.
        let rest = &self.text[self.pos..];
        let run_end = memchr(ESC, rest.as_bytes()).unwrap_or(rest.len());
        let run = &rest[..run_end];

        let cluster = run.graphemes(true).next()?;
        self.pos += cluster.len();
        Some(Segment::Grapheme {
            cluster,
            width: grapheme_width(cluster).min(u16::MAX as usize) as u16,
        })
    }
}

/// Skip an escape sequence starting at `pos` (pointing at the ESC byte).
/// Returns the byte index after the complete sequence.
fn skip_escape_sequence(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => skip_csi(bytes, next + 1),
        b']' => skip_string_terminated(bytes, next + 1),
        b'P' | b'^' | b'_' => skip_string_terminated(bytes, next + 1),
        _ => next + 1, // Two-character sequence
    }
}

/// Skip a CSI sequence. `pos` is the byte after `[`.
///
/// CSI format: parameter bytes (0x30-0x3F), intermediate bytes
/// (0x20-0x2F), final byte (0x40-0x7E).
fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let len = bytes.len();
    let mut i = pos;

    while i < len {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1; // Final byte, sequence complete
        }
        if !(0x20..=0x7E).contains(&b) {
            return i; // Invalid byte, abort sequence
        }
        i += 1;
    }

    len // Unterminated, consume all
}

/// Skip a string-terminated sequence (OSC, DCS, PM, APC).
/// Terminates with BEL (0x07) or ST (`ESC \`).
fn skip_string_terminated(bytes: &[u8], pos: usize) -> usize {
    let len = bytes.len();
    let mut i = pos;

    while i < len {
        match bytes[i] {
            0x07 => return i + 1,
            ESC if i + 1 < len && bytes[i + 1] == b'\\' => return i + 2,
            _ => i += 1,
        }
    }

    len // Unterminated, consume all
}

/// Count the display columns occupied by a line's printable glyphs,
/// ignoring embedded control sequences.
pub fn visible_width(text: &str) -> u16 {
    let mut width: u32 = 0;
    for seg in segments(text) {
        if let Segment::Grapheme { width: w, .. } = seg {
            width += w as u32;
        }
    }
    width.min(u16::MAX as u32) as u16
}

/// Check whether a control sequence is an SGR reset (`ESC [ 0 m` or
/// `ESC [ m`).
fn is_sgr_reset(seq: &str) -> bool {
    let bytes = seq.as_bytes();
    if bytes.len() < 3 || bytes[0] != ESC || bytes[1] != b'[' || bytes.last() != Some(&b'm') {
        return false;
    }
    let params = &bytes[2..bytes.len() - 1];
    params.is_empty() || params.iter().all(|&b| b == b'0' || b == b';')
}

/// Find a style-reset control sequence among the trailing controls of a
/// line (after its last printable glyph).
///
/// A truncated colored run re-appends this so the dropped reset cannot
/// leak color into whatever is rendered next on the row.
pub fn trailing_reset(text: &str) -> Option<&str> {
    let mut candidate: Option<&str> = None;
    for seg in segments(text) {
        match seg {
            Segment::Grapheme { .. } => candidate = None,
            Segment::Control(seq) => {
                if is_sgr_reset(seq) {
                    candidate = Some(seq);
                }
            }
        }
    }
    candidate
}
