//! Property tests for ANSI-aware line clipping.

use proptest::prelude::*;
use weft_core::Rect;
use weft_render::ansi::{Segment, segments, visible_width};
use weft_render::clip::{ClipMode, ClipStack};

/// Lines mixing narrow runs, double-width glyphs, and SGR sequences.
fn arb_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-e]{1,4}",
            Just("日".to_owned()),
            Just("\x1b[31m".to_owned()),
            Just("\x1b[0m".to_owned()),
        ],
        0..8,
    )
    .prop_map(|pieces| pieces.concat())
}

fn arb_clip() -> impl Strategy<Value = Rect> {
    (0u16..12, 0u16..4, 1u16..12, 1u16..4).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn clipped_line_fits_the_region(
        line in arb_line(),
        clip in arb_clip(),
        x in 0u16..12,
        y in 0u16..4,
    ) {
        let mut stack = ClipStack::new();
        stack.push(clip, ClipMode::Clip);
        if let Some((start, out)) = stack.clip_line(x, y, &line) {
            let width = visible_width(&out);
            prop_assert!(width <= clip.width);
            prop_assert!(start >= clip.x && start >= x);
            prop_assert!(start as u32 + width as u32 <= clip.right() as u32);
            prop_assert!(y >= clip.y && y < clip.bottom());
        }
    }

    #[test]
    fn wide_glyphs_never_split(line in arb_line(), clip in arb_clip(), x in 0u16..12) {
        let mut stack = ClipStack::new();
        stack.push(clip, ClipMode::Clip);
        if let Some((_, out)) = stack.clip_line(x, clip.y, &line) {
            for seg in segments(&out) {
                if let Segment::Grapheme { cluster, .. } = seg {
                    // Every printable output cluster is either a padding
                    // space standing in for a cut glyph half or a cluster
                    // the input actually contained.
                    prop_assert!(cluster == " " || line.contains(cluster));
                }
            }
        }
    }

    #[test]
    fn overflow_chain_is_a_pass_through(
        line in arb_line(),
        clip in arb_clip(),
        x in 0u16..12,
        y in 0u16..4,
    ) {
        let mut stack = ClipStack::new();
        stack.push(clip, ClipMode::Overflow);
        prop_assert_eq!(stack.clip_line(x, y, &line), Some((x, line.clone())));
    }

    #[test]
    fn rows_outside_the_region_render_nothing(
        line in arb_line(),
        clip in arb_clip(),
        x in 0u16..12,
    ) {
        let mut stack = ClipStack::new();
        stack.push(clip, ClipMode::Clip);
        prop_assert_eq!(stack.clip_line(x, clip.bottom(), &line), None);
    }
}
