#![forbid(unsafe_code)]

//! The per-frame driver: reconcile, measure, arrange, render, reset.
//!
//! Runs on a single logical thread; nodes never block and never spawn
//! work of their own. The pipeline reports the minimum "time until next
//! visual change" over the tree so the external driver knows when to
//! request the next frame for animations.

use std::time::{Duration, Instant};

use weft_core::{Constraints, Rect, Size};
use weft_render::surface::Surface;

use crate::context::RenderContext;
use crate::node::{Node, needs_render};
use crate::reconcile::Widget;
use crate::theme::Theme;

/// Render one node and its subtree, skipping it entirely when nothing
/// underneath is dirty.
///
/// Before the node paints, the regions it is responsible for erasing are
/// cleared: the bounds of children orphaned this reconciliation, and its
/// own previous bounds when an arrange moved it.
pub fn render_node(node: &mut dyn Node, ctx: &mut RenderContext<'_>) {
    if !needs_render(node) {
        return;
    }

    let state = node.state();
    let orphans: smallvec::SmallVec<[Rect; 2]> = state.orphaned.clone();
    let vacated = if state.previous_bounds != state.bounds && !state.previous_bounds.is_empty() {
        Some(state.previous_bounds)
    } else {
        None
    };
    for rect in orphans {
        ctx.erase(rect);
    }
    if let Some(rect) = vacated {
        ctx.erase(rect);
    }

    node.render(ctx);
}

/// Frame-end walk: clear dirty flags and orphan lists on every node.
pub fn finish_frame(node: &mut dyn Node) {
    node.state_mut().end_frame();
    for child in node.children_mut() {
        finish_frame(&mut **child);
    }
}

fn min_next_frame(node: &dyn Node, now: Instant) -> Option<Duration> {
    let mut next = node.next_frame_in(now);
    for child in node.children() {
        next = match (next, min_next_frame(&**child, now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
    next
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// Minimum time until an animated node changes, if any. The driver
    /// must request a new frame no later than this.
    pub next_frame_in: Option<Duration>,
}

/// Owns the retained tree across frames.
#[derive(Default)]
pub struct Pipeline {
    root: Option<Box<dyn Node>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&dyn Node> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut (dyn Node + 'static)> {
        self.root.as_deref_mut()
    }

    /// Run one frame: reconcile the widget description onto the retained
    /// tree, lay the tree out against the surface's size, render dirty
    /// regions, and reset frame bookkeeping.
    pub fn run_frame(
        &mut self,
        widget: Box<dyn Widget>,
        surface: &mut Surface,
        theme: &dyn Theme,
        now: Instant,
    ) -> FrameResult {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "run_frame",
            width = surface.width(),
            height = surface.height()
        )
        .entered();

        let prev = self.root.take();
        let mut root = widget.reconcile(prev);

        let viewport = Size {
            width: surface.width(),
            height: surface.height(),
        };
        let constraints = Constraints::tight(viewport);
        let measured = root.measure(constraints);
        debug_assert!(
            constraints.is_satisfied_by(measured),
            "root measure violated its constraints"
        );
        root.arrange(Rect::from_size(viewport.width, viewport.height));

        {
            let mut ctx = RenderContext::new(surface, theme);
            render_node(&mut *root, &mut ctx);
        }
        finish_frame(&mut *root);

        let next_frame_in = min_next_frame(&*root, now);
        self.root = Some(root);
        FrameResult { next_frame_in }
    }
}
