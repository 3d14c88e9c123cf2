#![forbid(unsafe_code)]

//! Weft public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use weft_core::{
    Alignment, Constraints, Rect, Sides, Size, SizeHint, offsets, resolve_axis,
};

// --- Render re-exports -----------------------------------------------------

pub use weft_render::cell::{Cell, CellContent, PackedRgba, StyleFlags};
pub use weft_render::clip::{ClipMode, ClipStack};
pub use weft_render::composite::{CompositeSurface, Layer};
pub use weft_render::surface::Surface;
pub use weft_render::{char_width, display_width, grapheme_width};

// --- Tree re-exports -------------------------------------------------------

pub use weft_tree::{
    Action, Align, Axis, Background, BindingConfigurator, BindingTable, Border, Effect,
    FrameResult, Grid, GridPlacement, Hinted, InputEvent, InputOutcome, KeyCode, KeyPress,
    MapTheme, Modifiers, MouseEvent, MouseEventKind, Node, NodeState, NullTheme, Padding, Panel,
    Pipeline, RenderContext, Stack, SurfaceTransform, Text, Theme, Ticker, Widget,
    collect_focusable, needs_render,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Cell, Constraints, Node, PackedRgba, Pipeline, Rect, RenderContext, Sides,
        Size, SizeHint, Stack, Surface, Text, Theme, Widget,
    };

    pub use crate::{core, render, tree};
}

pub use weft_core as core;
pub use weft_render as render;
pub use weft_tree as tree;
