#![forbid(unsafe_code)]

//! Linear layout container.
//!
//! A stack lays its children along one axis, sizing each slot from the
//! child's [`SizeHint`] on that axis through the shared resolver. The
//! cross axis is the widest child, clamped by the constraints.

use std::any::Any;

use weft_core::{Constraints, Rect, Size, SizeHint, offsets, resolve_axis};

use crate::context::RenderContext;
use crate::node::{Node, NodeState, subtree_has_focus};
use crate::pipeline::render_node;
use crate::reconcile::{Widget, reconcile_children};

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    fn main(self, size: Size) -> u16 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    #[inline]
    fn cross(self, size: Size) -> u16 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }
}

/// Stack widget description.
pub struct Stack {
    axis: Axis,
    children: Vec<Box<dyn Widget>>,
}

impl Stack {
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            children: Vec::new(),
        }
    }

    pub fn vertical() -> Self {
        Self {
            axis: Axis::Vertical,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, widget: impl Widget + 'static) -> Self {
        self.children.push(Box::new(widget));
        self
    }

    pub fn child_boxed(mut self, widget: Box<dyn Widget>) -> Self {
        self.children.push(widget);
        self
    }
}

impl Widget for Stack {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let Stack { axis, children } = *self;
        match prev {
            Some(prev) => {
                let prev_bounds = prev.state().bounds;
                let had_focus = subtree_has_focus(&*prev);
                match prev.into_any().downcast::<StackNode>() {
                    Ok(mut node) => {
                        if node.axis != axis {
                            node.axis = axis;
                            node.state.mark_dirty();
                        }
                        let prev_children = std::mem::take(&mut node.children);
                        node.children = reconcile_children(&mut node.state, prev_children, children);
                        node
                    }
                    Err(_) => {
                        let mut node = StackNode::build(axis, children);
                        node.state.previous_bounds = prev_bounds;
                        node.state.lost_focused_child |= had_focus;
                        Box::new(node)
                    }
                }
            }
            None => Box::new(StackNode::build(axis, children)),
        }
    }
}

pub struct StackNode {
    state: NodeState,
    axis: Axis,
    children: Vec<Box<dyn Node>>,
}

impl StackNode {
    fn build(axis: Axis, widgets: Vec<Box<dyn Widget>>) -> Self {
        let children = widgets.into_iter().map(|w| w.reconcile(None)).collect();
        Self {
            state: NodeState::new(),
            axis,
            children,
        }
    }

    fn child_hint(&self, index: usize) -> SizeHint {
        let state = self.children[index].state();
        match self.axis {
            Axis::Horizontal => state.width_hint.unwrap_or_default(),
            Axis::Vertical => state.height_hint.unwrap_or_default(),
        }
    }

    /// Resolve per-child main-axis sizes for the given extents.
    fn resolve(&mut self, max_width: u16, max_height: u16) -> Vec<u16> {
        let loose = Constraints::loose(max_width, max_height);
        let measured: Vec<Size> = self.children.iter_mut().map(|c| c.measure(loose)).collect();
        let hints: Vec<SizeHint> = (0..self.children.len())
            .map(|i| self.child_hint(i))
            .collect();
        let available = match self.axis {
            Axis::Horizontal => max_width,
            Axis::Vertical => max_height,
        };
        resolve_axis(&hints, |i| self.axis.main(measured[i]), available)
    }
}

impl Node for StackNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let axis = self.axis;
        let loose = constraints.loosen();
        let measured: Vec<Size> = self.children.iter_mut().map(|c| c.measure(loose)).collect();
        let hints: Vec<SizeHint> = (0..self.children.len())
            .map(|i| self.child_hint(i))
            .collect();
        let available = match axis {
            Axis::Horizontal => constraints.max_width,
            Axis::Vertical => constraints.max_height,
        };
        let sizes = resolve_axis(&hints, |i| axis.main(measured[i]), available);

        let mut main: u16 = 0;
        for size in &sizes {
            main = main.saturating_add(*size);
        }
        let cross = measured.iter().map(|m| axis.cross(*m)).max().unwrap_or(0);
        let size = match axis {
            Axis::Horizontal => Size {
                width: main,
                height: cross,
            },
            Axis::Vertical => Size {
                width: cross,
                height: main,
            },
        };
        constraints.constrain(size)
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        let sizes = self.resolve(bounds.width, bounds.height);
        let offs = offsets(&sizes);
        for (i, child) in self.children.iter_mut().enumerate() {
            let rect = match self.axis {
                Axis::Horizontal => Rect::new(
                    bounds.x.saturating_add(offs[i]),
                    bounds.y,
                    sizes[i],
                    bounds.height,
                ),
                Axis::Vertical => Rect::new(
                    bounds.x,
                    bounds.y.saturating_add(offs[i]),
                    bounds.width,
                    sizes[i],
                ),
            };
            child.arrange(rect);
        }
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        for child in &mut self.children {
            render_node(&mut **child, ctx);
        }
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
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
