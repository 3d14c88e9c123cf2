#![forbid(unsafe_code)]

//! The render-tree node: layout protocol, dirty bookkeeping, and the
//! data the input/focus subsystem reads.
//!
//! Nodes are owned by their parents (`Vec<Box<dyn Node>>`); there is no
//! parent back-pointer. Ancestor context (clip chain, inherited colors)
//! is carried by the render pass instead, so the tree has no reference
//! cycles.
//!
//! Layout is two-pass: `measure(constraints)` returns a size satisfying
//! the constraints and is idempotent within a frame; `arrange(bounds)`
//! runs at most once per node per frame, stores the bounds before
//! arranging children, and marks the node dirty when they changed.

use std::any::Any;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use weft_core::{Constraints, Rect, Size, SizeHint};

use crate::bindings::{BindingConfigurator, BindingTable, InputEvent, InputOutcome};
use crate::context::RenderContext;

/// Bookkeeping every node owns.
///
/// Created dirty so a brand-new node is always rendered at least once.
pub struct NodeState {
    /// Bounds assigned by the most recent arrange.
    pub bounds: Rect,
    /// Bounds as of the prior frame; initially empty. Used by the render
    /// pass to erase the region a moved node vacated.
    pub previous_bounds: Rect,
    dirty: bool,
    /// Last-known bounds of children removed this reconciliation,
    /// consumed and cleared after the frame renders. Positive-area rects
    /// only.
    pub orphaned: SmallVec<[Rect; 2]>,
    /// Set by the focus subsystem when this node holds focus.
    pub focused: bool,
    /// Set when reconciliation dropped a focused node under (or at) this
    /// position, so the focus subsystem can pick a replacement target.
    pub lost_focused_child: bool,
    /// Sizing policy consumed by the layout parent; `None` means Content.
    pub width_hint: Option<SizeHint>,
    pub height_hint: Option<SizeHint>,
    /// Key bindings: type defaults overlaid with the configurator.
    pub bindings: BindingTable,
    pub(crate) configurator: Option<BindingConfigurator>,
    pub(crate) bindings_built: bool,
}

impl NodeState {
    pub fn new() -> Self {
        Self {
            bounds: Rect::default(),
            previous_bounds: Rect::default(),
            dirty: true,
            orphaned: SmallVec::new(),
            focused: false,
            lost_focused_child: false,
            width_hint: None,
            height_hint: None,
            bindings: BindingTable::new(),
            configurator: None,
            bindings_built: false,
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Idempotent.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Store the previous bounds and adopt the new ones, marking dirty on
    /// change. Must run before a node arranges its children.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.previous_bounds = self.bounds;
        if self.bounds != bounds {
            self.bounds = bounds;
            self.mark_dirty();
        }
    }

    /// Record the last bounds of a removed child so the vacated region is
    /// repainted. Zero-area rects are dropped; recording marks this node
    /// dirty even if nothing else about it changed.
    pub fn record_orphan(&mut self, bounds: Rect) {
        if bounds.is_empty() {
            return;
        }
        self.orphaned.push(bounds);
        self.mark_dirty();
    }

    /// Frame-end reset: clears the dirty flag, the orphan list, and the
    /// lost-focus marker. Called by the frame driver after a successful
    /// render.
    pub fn end_frame(&mut self) {
        self.dirty = false;
        self.orphaned.clear();
        self.lost_focused_child = false;
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for NodeState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeState")
            .field("bounds", &self.bounds)
            .field("previous_bounds", &self.previous_bounds)
            .field("dirty", &self.dirty)
            .field("orphaned", &self.orphaned)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

/// A persistent, mutable render-tree unit.
///
/// One implementing type per widget kind. The reconciler downcasts
/// through `as_any`/`into_any` to decide reuse versus replacement.
pub trait Node {
    fn state(&self) -> &NodeState;
    fn state_mut(&mut self) -> &mut NodeState;

    /// Compute the node's size under the given constraints.
    ///
    /// The result must satisfy the constraints; violating them is a
    /// defect in the node, caught by tests rather than handled at
    /// runtime.
    fn measure(&mut self, constraints: Constraints) -> Size;

    /// Finalize geometry. Implementations call
    /// [`NodeState::set_bounds`] before arranging any children.
    fn arrange(&mut self, bounds: Rect);

    /// Paint this node and its subtree. Container nodes recurse via
    /// [`crate::pipeline::render_node`] so clean subtrees are skipped and
    /// vacated regions erased.
    fn render(&mut self, ctx: &mut RenderContext<'_>);

    fn children(&self) -> &[Box<dyn Node>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut []
    }

    /// Whether the focus subsystem may give this node focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Region that responds to pointer hits; defaults to the full bounds
    /// but may be narrowed (e.g. a splitter's handle).
    fn hit_test_bounds(&self) -> Rect {
        self.state().bounds
    }

    /// Install this node kind's default key bindings.
    fn default_bindings(&self, _table: &mut BindingTable) {}

    /// Fallback for events no binding matched.
    fn handle_input(&mut self, _event: &InputEvent) -> InputOutcome {
        InputOutcome::Ignored
    }

    /// Time until this node's next visual change, if it animates. The
    /// external frame driver schedules the next frame no later than the
    /// minimum over the tree.
    fn next_frame_in(&self, _now: Instant) -> Option<Duration> {
        None
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Recursive dirty check: a node needs rendering when it or any
/// descendant is dirty. Short-circuits, so a settled subtree is not
/// walked further.
pub fn needs_render(node: &dyn Node) -> bool {
    node.state().is_dirty() || node.children().iter().any(|c| needs_render(&**c))
}

/// Collect focusable nodes in preorder.
pub fn collect_focusable<'a>(node: &'a dyn Node, out: &mut Vec<&'a dyn Node>) {
    if node.is_focusable() {
        out.push(node);
    }
    for child in node.children() {
        collect_focusable(&**child, out);
    }
}

/// Whether this node or any descendant currently holds focus.
pub fn subtree_has_focus(node: &dyn Node) -> bool {
    node.state().focused || node.children().iter().any(|c| subtree_has_focus(&**c))
}

#[cfg(test)]
mod tests {
    use super::NodeState;
    use weft_core::Rect;

    #[test]
    fn new_state_is_dirty_with_empty_previous_bounds() {
        let state = NodeState::new();
        assert!(state.is_dirty());
        assert!(state.previous_bounds.is_empty());
        assert!(state.orphaned.is_empty());
    }

    #[test]
    fn set_bounds_records_previous_and_marks_dirty_on_change() {
        let mut state = NodeState::new();
        state.end_frame();

        let first = Rect::new(1, 1, 5, 5);
        state.set_bounds(first);
        assert!(state.is_dirty());
        assert_eq!(state.bounds, first);
        assert!(state.previous_bounds.is_empty());

        state.end_frame();
        state.set_bounds(first);
        // Unchanged bounds do not re-dirty.
        assert!(!state.is_dirty());

        let moved = Rect::new(2, 2, 5, 5);
        state.set_bounds(moved);
        assert!(state.is_dirty());
        assert_eq!(state.previous_bounds, first);
    }

    #[test]
    fn record_orphan_keeps_positive_area_only() {
        let mut state = NodeState::new();
        state.end_frame();

        state.record_orphan(Rect::new(1, 1, 0, 5));
        assert!(state.orphaned.is_empty());
        assert!(!state.is_dirty());

        state.record_orphan(Rect::new(2, 3, 4, 5));
        assert_eq!(state.orphaned.as_slice(), &[Rect::new(2, 3, 4, 5)]);
        assert!(state.is_dirty());
    }

    #[test]
    fn end_frame_clears_dirty_and_orphans() {
        let mut state = NodeState::new();
        state.record_orphan(Rect::new(0, 0, 1, 1));
        state.lost_focused_child = true;

        state.end_frame();
        assert!(!state.is_dirty());
        assert!(state.orphaned.is_empty());
        assert!(!state.lost_focused_child);
    }

    #[test]
    fn mark_dirty_is_idempotent() {
        let mut state = NodeState::new();
        state.mark_dirty();
        state.mark_dirty();
        assert!(state.is_dirty());
    }
}
