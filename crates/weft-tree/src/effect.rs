#![forbid(unsafe_code)]

//! Post-processing effect node.
//!
//! Renders its subtree into an offscreen surface sized to its own
//! bounds, hands that surface to a caller-supplied transform, then
//! composites the result back into the parent surface at its bounds
//! offset. The ambient clip rectangle is translated into the
//! offscreen's local space during the subtree render and applied again
//! in parent coordinates during the composite, so outer clipping holds
//! on both sides.
//!
//! Descendants are arranged at the offscreen origin, so their recorded
//! bounds are local while pointer events arrive in absolute
//! coordinates. Hosts routing pointer events into the subtree must
//! translate them through [`EffectNode::to_local`] first.

use std::any::Any;
use std::rc::Rc;
use std::slice;

use weft_core::{Constraints, Rect, Size};
use weft_render::surface::Surface;

use crate::context::RenderContext;
use crate::node::{Node, NodeState, subtree_has_focus};
use crate::pipeline::render_node;
use crate::reconcile::Widget;

/// Surface transform applied between the offscreen render and the
/// composite. Identity (`Rc::ptr_eq`) decides reuse during reconcile.
pub type SurfaceTransform = Rc<dyn Fn(&mut Surface)>;

/// Effect widget description.
pub struct Effect {
    transform: SurfaceTransform,
    child: Box<dyn Widget>,
}

impl Effect {
    pub fn new(transform: SurfaceTransform, child: impl Widget + 'static) -> Self {
        Self {
            transform,
            child: Box::new(child),
        }
    }
}

impl Widget for Effect {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let Effect { transform, child } = *self;
        match prev {
            Some(prev) => {
                let prev_bounds = prev.state().bounds;
                let had_focus = subtree_has_focus(&*prev);
                match prev.into_any().downcast::<EffectNode>() {
                    Ok(mut node) => {
                        if !Rc::ptr_eq(&node.transform, &transform) {
                            node.transform = transform;
                            node.state.mark_dirty();
                        }
                        let prev_child = std::mem::replace(
                            &mut node.child,
                            Box::new(crate::decor::Spacer::node()),
                        );
                        node.child = child.reconcile(Some(prev_child));
                        node
                    }
                    Err(_) => {
                        let mut node = EffectNode::build(transform, child);
                        node.state.previous_bounds = prev_bounds;
                        node.state.lost_focused_child |= had_focus;
                        Box::new(node)
                    }
                }
            }
            None => Box::new(EffectNode::build(transform, child)),
        }
    }
}

pub struct EffectNode {
    state: NodeState,
    transform: SurfaceTransform,
    child: Box<dyn Node>,
}

impl EffectNode {
    fn build(transform: SurfaceTransform, child: Box<dyn Widget>) -> Self {
        Self {
            state: NodeState::new(),
            transform,
            child: child.reconcile(None),
        }
    }

    /// Translate an absolute position into the subtree's local
    /// coordinate space. Descendant bounds are recorded relative to
    /// this node's origin, so pointer hit tests against them must go
    /// through this first.
    pub fn to_local(&self, x: u16, y: u16) -> (u16, u16) {
        let b = self.state.bounds;
        (x.saturating_sub(b.x), y.saturating_sub(b.y))
    }
}

impl Node for EffectNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        constraints.constrain(self.child.measure(constraints))
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        // The subtree lives in the offscreen surface's local coordinates.
        self.child
            .arrange(Rect::from_size(bounds.width, bounds.height));
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let bounds = self.state.bounds;
        if bounds.is_empty() {
            return;
        }
        let child = &mut self.child;
        let mut offscreen = ctx.offscreen(
            bounds.width,
            bounds.height,
            (bounds.x, bounds.y),
            |local| {
                render_node(&mut **child, local);
            },
        );
        (self.transform)(&mut offscreen);
        ctx.composite(&offscreen, bounds.x, bounds.y);
    }

    fn children(&self) -> &[Box<dyn Node>] {
        slice::from_ref(&self.child)
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        slice::from_mut(&mut self.child)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
