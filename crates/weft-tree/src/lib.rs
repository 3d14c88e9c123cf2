#![forbid(unsafe_code)]

//! Retained render tree: reconciliation, two-pass layout, dirty
//! tracking, and clip-aware rendering over a cell surface.
//!
//! A declarative widget description is reconciled onto a persistent node
//! tree each frame; nodes keep their internal state (scroll offsets,
//! selection, timers) across updates. Layout runs measure-then-arrange
//! with [`weft_core::Constraints`]; rendering walks only dirty subtrees
//! and erases the regions removed or moved nodes vacated.

pub mod animate;
pub mod bindings;
pub mod context;
pub mod decor;
pub mod effect;
pub mod grid;
pub mod node;
pub mod pipeline;
pub mod reconcile;
pub mod stack;
pub mod text;
pub mod theme;

pub use animate::Ticker;
pub use bindings::{
    Action, BindingConfigurator, BindingTable, InputEvent, InputOutcome, KeyCode, KeyPress,
    Modifiers, MouseEvent, MouseEventKind,
};
pub use context::RenderContext;
pub use decor::{Align, Background, Border, Padding, Panel};
pub use effect::{Effect, SurfaceTransform};
pub use grid::{Grid, GridPlacement};
pub use node::{Node, NodeState, collect_focusable, needs_render, subtree_has_focus};
pub use pipeline::{FrameResult, Pipeline, finish_frame, render_node};
pub use reconcile::{Hinted, Widget, apply_configurator, reconcile_children, reuse_or_replace};
pub use stack::{Axis, Stack};
pub use text::Text;
pub use theme::{MapTheme, NullTheme, Theme};
