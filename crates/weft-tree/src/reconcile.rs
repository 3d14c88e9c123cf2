#![forbid(unsafe_code)]

//! Reconciliation: mapping a widget description onto the existing node
//! tree.
//!
//! A widget reconciled against a previous node of the same kind mutates
//! it in place: externally supplied properties are overwritten while
//! internally owned state (selection, scroll position, timers) survives.
//! A kind mismatch is not an error; the defined behavior is "replace",
//! with the replacement inheriting the old node's last-known bounds so
//! the dirty pass knows which region to erase. Reconciliation never
//! fails: a malformed description degrades to replace, because the
//! render loop cannot stop mid-frame with a half-updated tree.

use weft_core::SizeHint;

use crate::bindings::BindingConfigurator;
use crate::node::{Node, NodeState, subtree_has_focus};

/// A declarative, externally-owned description of desired UI, consumed
/// once per frame to produce or update a node.
pub trait Widget {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node>;
}

/// Reuse `prev` in place when it is an `N`, otherwise build a fresh node.
///
/// On reuse, `update` overwrites the externally supplied properties and
/// leaves internal state untouched; focus identity is preserved because
/// the node itself survives. On replacement the fresh node (dirty by
/// construction) inherits the previous node's bounds into
/// `previous_bounds` for erase bookkeeping, and records whether the
/// replaced subtree held focus so the focus subsystem can restore it.
pub fn reuse_or_replace<N>(
    prev: Option<Box<dyn Node>>,
    update: impl FnOnce(&mut N),
    build: impl FnOnce() -> N,
) -> Box<dyn Node>
where
    N: Node + 'static,
{
    match prev {
        None => Box::new(build()),
        Some(prev) => {
            let prev_bounds = prev.state().bounds;
            let had_focus = subtree_has_focus(&*prev);
            match prev.into_any().downcast::<N>() {
                Ok(mut node) => {
                    update(&mut node);
                    node
                }
                Err(_) => {
                    let mut node = build();
                    node.state_mut().previous_bounds = prev_bounds;
                    node.state_mut().lost_focused_child |= had_focus;
                    Box::new(node)
                }
            }
        }
    }
}

/// Reconcile a widget list against previous children, pairwise by
/// position. Surplus previous children are orphaned: their last bounds
/// go on the parent's orphan list (positive area only), the parent is
/// marked dirty, and a dropped focused subtree is recorded before the
/// node is destroyed.
pub fn reconcile_children(
    parent: &mut NodeState,
    prev_children: Vec<Box<dyn Node>>,
    widgets: Vec<Box<dyn Widget>>,
) -> Vec<Box<dyn Node>> {
    let mut prev = prev_children.into_iter();
    let mut out = Vec::with_capacity(widgets.len());
    for widget in widgets {
        out.push(widget.reconcile(prev.next()));
    }
    for removed in prev {
        orphan(parent, removed);
    }
    out
}

/// Record a removed child on its former parent and drop it.
pub fn orphan(parent: &mut NodeState, removed: Box<dyn Node>) {
    parent.record_orphan(removed.state().bounds);
    if subtree_has_focus(&*removed) {
        parent.lost_focused_child = true;
        parent.mark_dirty();
    }
}

/// Rebuild a node's binding table when needed: on first build, or when
/// the external configurator's identity changed. The table is the node
/// kind's defaults overlaid with the configurator.
pub fn apply_configurator(node: &mut dyn Node, configurator: Option<BindingConfigurator>) {
    let state = node.state();
    let unchanged = state.bindings_built
        && match (state.configurator.as_ref(), configurator.as_ref()) {
            (None, None) => true,
            (Some(a), Some(b)) => std::rc::Rc::ptr_eq(a, b),
            _ => false,
        };
    if unchanged {
        return;
    }

    let mut table = crate::bindings::BindingTable::new();
    node.default_bindings(&mut table);
    if let Some(cfg) = configurator.as_ref() {
        cfg(&mut table);
    }
    let state = node.state_mut();
    state.bindings = table;
    state.configurator = configurator;
    state.bindings_built = true;
}

/// Wraps a widget to attach sizing hints to the node it produces.
///
/// Hints are externally supplied properties: they are overwritten on
/// every reconcile, and a change dirties the node since the layout
/// parent will place it differently.
pub struct Hinted {
    inner: Box<dyn Widget>,
    width: Option<SizeHint>,
    height: Option<SizeHint>,
}

impl Hinted {
    pub fn new(inner: Box<dyn Widget>) -> Self {
        Self {
            inner,
            width: None,
            height: None,
        }
    }

    pub fn width(mut self, hint: SizeHint) -> Self {
        self.width = Some(hint);
        self
    }

    pub fn height(mut self, hint: SizeHint) -> Self {
        self.height = Some(hint);
        self
    }
}

impl Widget for Hinted {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let Hinted {
            inner,
            width,
            height,
        } = *self;
        let mut node = inner.reconcile(prev);
        let state = node.state_mut();
        if state.width_hint != width || state.height_hint != height {
            state.width_hint = width;
            state.height_hint = height;
            state.mark_dirty();
        }
        node
    }
}
