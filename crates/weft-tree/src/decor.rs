#![forbid(unsafe_code)]

//! Single-child decorators: padding, border, background, alignment, and
//! the clipping panel.
//!
//! Each decorator subtracts its fixed inset from the constraints passed
//! to the child during measure, adds it back to the child's reported
//! size, and offsets the child's rectangle at arrange. Alignment instead
//! measures the child's natural size under loosened constraints and
//! places it inside the assigned bounds, clamping the offset to zero
//! when the child is larger than the space.

use std::any::Any;
use std::slice;

use weft_core::{Alignment, Constraints, Rect, Sides, Size};
use weft_render::cell::Cell;
use weft_render::clip::ClipMode;

use crate::context::RenderContext;
use crate::node::{Node, NodeState};
use crate::pipeline::render_node;
use crate::reconcile::Widget;

/// Shared reconcile shape for single-child decorators: downcast, update
/// the external properties, recurse into the child.
macro_rules! decorate_reconcile {
    ($widget:ident, $node:ident, $self:ident, $prev:ident,
     { $($field:ident),* $(,)? }, $update:expr) => {{
        let $widget { child, $($field),* } = *$self;
        match $prev {
            Some(prev) => {
                let prev_bounds = prev.state().bounds;
                let had_focus = crate::node::subtree_has_focus(&*prev);
                match prev.into_any().downcast::<$node>() {
                    Ok(mut node) => {
                        #[allow(clippy::redundant_closure_call)]
                        ($update)(&mut node, $($field),*);
                        let prev_child = std::mem::replace(
                            &mut node.child,
                            Box::new(crate::decor::Spacer::node()),
                        );
                        node.child = child.reconcile(Some(prev_child));
                        node
                    }
                    Err(_) => {
                        let mut node = $node::build(child, $($field),*);
                        node.state.previous_bounds = prev_bounds;
                        node.state.lost_focused_child |= had_focus;
                        Box::new(node)
                    }
                }
            }
            None => Box::new($node::build(child, $($field),*)),
        }
    }};
}

/// A zero-sized placeholder node, used as the swap target when a
/// decorator hands its child to the reconciler.
pub struct Spacer {
    state: NodeState,
}

impl Spacer {
    pub fn node() -> Self {
        Self {
            state: NodeState::new(),
        }
    }
}

impl Node for Spacer {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        constraints.constrain(Size::ZERO)
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

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

// ---------------------------------------------------------------------
// Padding

pub struct Padding {
    sides: Sides,
    child: Box<dyn Widget>,
}

impl Padding {
    pub fn new(sides: impl Into<Sides>, child: impl Widget + 'static) -> Self {
        Self {
            sides: sides.into(),
            child: Box::new(child),
        }
    }
}

impl Widget for Padding {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        decorate_reconcile!(Padding, PaddingNode, self, prev, { sides }, |node: &mut PaddingNode,
                                                                          sides: Sides| {
            if node.sides != sides {
                node.sides = sides;
                node.state.mark_dirty();
            }
        })
    }
}

pub struct PaddingNode {
    state: NodeState,
    sides: Sides,
    child: Box<dyn Node>,
}

impl PaddingNode {
    fn build(child: Box<dyn Widget>, sides: Sides) -> Self {
        Self {
            state: NodeState::new(),
            sides,
            child: child.reconcile(None),
        }
    }
}

impl Node for PaddingNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let inner = self.child.measure(constraints.deflate(self.sides));
        constraints.constrain(Size {
            width: inner.width.saturating_add(self.sides.horizontal_sum()),
            height: inner.height.saturating_add(self.sides.vertical_sum()),
        })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        self.child.arrange(bounds.inner(self.sides));
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        render_node(&mut *self.child, ctx);
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

// ---------------------------------------------------------------------
// Border

pub struct Border {
    color_key: Option<String>,
    child: Box<dyn Widget>,
}

impl Border {
    pub fn new(child: impl Widget + 'static) -> Self {
        Self {
            color_key: None,
            child: Box::new(child),
        }
    }

    /// Theme key for the border color.
    pub fn color_key(mut self, key: impl Into<String>) -> Self {
        self.color_key = Some(key.into());
        self
    }
}

impl Widget for Border {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        decorate_reconcile!(
            Border,
            BorderNode,
            self,
            prev,
            { color_key },
            |node: &mut BorderNode, color_key: Option<String>| {
                if node.color_key != color_key {
                    node.color_key = color_key;
                    node.state.mark_dirty();
                }
            }
        )
    }
}

pub struct BorderNode {
    state: NodeState,
    color_key: Option<String>,
    child: Box<dyn Node>,
}

impl BorderNode {
    const INSET: Sides = Sides::all(1);

    fn build(child: Box<dyn Widget>, color_key: Option<String>) -> Self {
        Self {
            state: NodeState::new(),
            color_key,
            child: child.reconcile(None),
        }
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let bounds = self.state.bounds;
        if bounds.width < 2 || bounds.height < 2 {
            return;
        }
        let inner_width = (bounds.width - 2) as usize;
        let top = format!("┌{}┐", "─".repeat(inner_width));
        let bottom = format!("└{}┘", "─".repeat(inner_width));
        ctx.write_clipped(bounds.x, bounds.y, &top);
        ctx.write_clipped(bounds.x, bounds.bottom() - 1, &bottom);
        for y in (bounds.y + 1)..(bounds.bottom() - 1) {
            ctx.write_clipped(bounds.x, y, "│");
            ctx.write_clipped(bounds.right() - 1, y, "│");
        }
    }
}

impl Node for BorderNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let inner = self.child.measure(constraints.deflate(Self::INSET));
        constraints.constrain(Size {
            width: inner.width.saturating_add(2),
            height: inner.height.saturating_add(2),
        })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        self.child.arrange(bounds.inner(Self::INSET));
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let color = self.color_key.as_deref().and_then(|k| ctx.theme_color(k));
        if let Some(fg) = color {
            ctx.push_fg(fg);
        }
        self.draw(ctx);
        if color.is_some() {
            ctx.pop_fg();
        }
        render_node(&mut *self.child, ctx);
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

// ---------------------------------------------------------------------
// Background

pub struct Background {
    color_key: String,
    child: Box<dyn Widget>,
}

impl Background {
    pub fn new(color_key: impl Into<String>, child: impl Widget + 'static) -> Self {
        Self {
            color_key: color_key.into(),
            child: Box::new(child),
        }
    }
}

impl Widget for Background {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        decorate_reconcile!(
            Background,
            BackgroundNode,
            self,
            prev,
            { color_key },
            |node: &mut BackgroundNode, color_key: String| {
                if node.color_key != color_key {
                    node.color_key = color_key;
                    node.state.mark_dirty();
                }
            }
        )
    }
}

pub struct BackgroundNode {
    state: NodeState,
    color_key: String,
    child: Box<dyn Node>,
}

impl BackgroundNode {
    fn build(child: Box<dyn Widget>, color_key: String) -> Self {
        Self {
            state: NodeState::new(),
            color_key,
            child: child.reconcile(None),
        }
    }
}

impl Node for BackgroundNode {
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
        self.child.arrange(bounds);
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let bg = ctx.theme_color(&self.color_key);
        if let Some(color) = bg {
            ctx.fill(self.state.bounds, Cell::from_char(' ').with_bg(color));
            ctx.push_bg(color);
        }
        render_node(&mut *self.child, ctx);
        if bg.is_some() {
            ctx.pop_bg();
        }
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

// ---------------------------------------------------------------------
// Align

pub struct Align {
    horizontal: Alignment,
    vertical: Alignment,
    child: Box<dyn Widget>,
}

impl Align {
    /// Start-aligned on both axes unless a policy is set.
    pub fn new(child: impl Widget + 'static) -> Self {
        Self {
            horizontal: Alignment::Start,
            vertical: Alignment::Start,
            child: Box::new(child),
        }
    }

    pub fn horizontal(mut self, alignment: Alignment) -> Self {
        self.horizontal = alignment;
        self
    }

    pub fn vertical(mut self, alignment: Alignment) -> Self {
        self.vertical = alignment;
        self
    }

    pub fn center(child: impl Widget + 'static) -> Self {
        Self::new(child)
            .horizontal(Alignment::Center)
            .vertical(Alignment::Center)
    }
}

impl Widget for Align {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        decorate_reconcile!(
            Align,
            AlignNode,
            self,
            prev,
            { horizontal, vertical },
            |node: &mut AlignNode, horizontal: Alignment, vertical: Alignment| {
                if node.horizontal != horizontal || node.vertical != vertical {
                    node.horizontal = horizontal;
                    node.vertical = vertical;
                    node.state.mark_dirty();
                }
            }
        )
    }
}

pub struct AlignNode {
    state: NodeState,
    horizontal: Alignment,
    vertical: Alignment,
    child: Box<dyn Node>,
}

impl AlignNode {
    fn build(child: Box<dyn Widget>, horizontal: Alignment, vertical: Alignment) -> Self {
        Self {
            state: NodeState::new(),
            horizontal,
            vertical,
            child: child.reconcile(None),
        }
    }
}

impl Node for AlignNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        constraints.constrain(self.child.measure(constraints.loosen()))
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        // Natural size under loosened constraints decides the placement.
        let natural = self
            .child
            .measure(Constraints::loose(bounds.width, bounds.height));
        let x = bounds
            .x
            .saturating_add(self.horizontal.offset(bounds.width, natural.width));
        let y = bounds
            .y
            .saturating_add(self.vertical.offset(bounds.height, natural.height));
        self.child
            .arrange(Rect::new(x, y, natural.width, natural.height));
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        render_node(&mut *self.child, ctx);
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

// ---------------------------------------------------------------------
// Panel

/// Border + optional background + a clip region for its subtree.
pub struct Panel {
    bg_key: Option<String>,
    border_key: Option<String>,
    clip_mode: ClipMode,
    child: Box<dyn Widget>,
}

impl Panel {
    pub fn new(child: impl Widget + 'static) -> Self {
        Self {
            bg_key: None,
            border_key: None,
            clip_mode: ClipMode::Clip,
            child: Box::new(child),
        }
    }

    pub fn bg_key(mut self, key: impl Into<String>) -> Self {
        self.bg_key = Some(key.into());
        self
    }

    pub fn border_key(mut self, key: impl Into<String>) -> Self {
        self.border_key = Some(key.into());
        self
    }

    /// Let the subtree spill outside the panel, provided every enclosing
    /// provider also overflows.
    pub fn overflow(mut self) -> Self {
        self.clip_mode = ClipMode::Overflow;
        self
    }
}

impl Widget for Panel {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        decorate_reconcile!(
            Panel,
            PanelNode,
            self,
            prev,
            { bg_key, border_key, clip_mode },
            |node: &mut PanelNode,
             bg_key: Option<String>,
             border_key: Option<String>,
             clip_mode: ClipMode| {
                if node.bg_key != bg_key
                    || node.border_key != border_key
                    || node.clip_mode != clip_mode
                {
                    node.bg_key = bg_key;
                    node.border_key = border_key;
                    node.clip_mode = clip_mode;
                    node.state.mark_dirty();
                }
            }
        )
    }
}

pub struct PanelNode {
    state: NodeState,
    bg_key: Option<String>,
    border_key: Option<String>,
    clip_mode: ClipMode,
    child: Box<dyn Node>,
}

impl PanelNode {
    const INSET: Sides = Sides::all(1);

    fn build(
        child: Box<dyn Widget>,
        bg_key: Option<String>,
        border_key: Option<String>,
        clip_mode: ClipMode,
    ) -> Self {
        Self {
            state: NodeState::new(),
            bg_key,
            border_key,
            clip_mode,
            child: child.reconcile(None),
        }
    }

    fn draw_chrome(&self, ctx: &mut RenderContext<'_>) {
        let bounds = self.state.bounds;
        if let Some(bg) = self.bg_key.as_deref().and_then(|k| ctx.theme_color(k)) {
            ctx.fill(bounds, Cell::from_char(' ').with_bg(bg));
        }
        if bounds.width < 2 || bounds.height < 2 {
            return;
        }
        let color = self.border_key.as_deref().and_then(|k| ctx.theme_color(k));
        if let Some(fg) = color {
            ctx.push_fg(fg);
        }
        let inner_width = (bounds.width - 2) as usize;
        ctx.write_clipped(
            bounds.x,
            bounds.y,
            &format!("┌{}┐", "─".repeat(inner_width)),
        );
        ctx.write_clipped(
            bounds.x,
            bounds.bottom() - 1,
            &format!("└{}┘", "─".repeat(inner_width)),
        );
        for y in (bounds.y + 1)..(bounds.bottom() - 1) {
            ctx.write_clipped(bounds.x, y, "│");
            ctx.write_clipped(bounds.right() - 1, y, "│");
        }
        if color.is_some() {
            ctx.pop_fg();
        }
    }
}

impl Node for PanelNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let inner = self.child.measure(constraints.deflate(Self::INSET));
        constraints.constrain(Size {
            width: inner.width.saturating_add(2),
            height: inner.height.saturating_add(2),
        })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
        self.child.arrange(bounds.inner(Self::INSET));
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        self.draw_chrome(ctx);
        ctx.clip
            .push(self.state.bounds.inner(Self::INSET), self.clip_mode);
        render_node(&mut *self.child, ctx);
        ctx.clip.pop();
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

#[cfg(test)]
mod tests {
    use super::{Align, Background, Border, Padding, Panel};
    use crate::context::RenderContext;
    use crate::node::Node;
    use crate::reconcile::Widget;
    use crate::theme::{MapTheme, NullTheme};
    use weft_core::{Alignment, Constraints, Rect, Size};
    use weft_render::cell::PackedRgba;
    use weft_render::surface::Surface;

    use crate::text::Text;

    #[test]
    fn padding_insets_child_and_inflates_size() {
        let mut node = Box::new(Padding::new(1u16, Text::new("abc"))).reconcile(None);
        let size = node.measure(Constraints::loose(20, 20));
        assert_eq!(
            size,
            Size {
                width: 5,
                height: 3
            }
        );

        node.arrange(Rect::new(0, 0, 5, 3));
        assert_eq!(node.children()[0].state().bounds, Rect::new(1, 1, 3, 1));
    }

    #[test]
    fn border_draws_box_glyphs_around_child() {
        let mut node = Box::new(Border::new(Text::new("hi"))).reconcile(None);
        node.arrange(Rect::new(0, 0, 4, 3));

        let mut surface = Surface::new(6, 4);
        let mut ctx = RenderContext::new(&mut surface, &NullTheme);
        node.render(&mut ctx);

        assert_eq!(surface.get(0, 0).unwrap().content.as_char(), Some('┌'));
        assert_eq!(surface.get(3, 0).unwrap().content.as_char(), Some('┐'));
        assert_eq!(surface.get(0, 2).unwrap().content.as_char(), Some('└'));
        assert_eq!(surface.get(0, 1).unwrap().content.as_char(), Some('│'));
        assert_eq!(surface.get(1, 1).unwrap().content.as_char(), Some('h'));
    }

    #[test]
    fn degenerate_border_renders_nothing_but_does_not_fail() {
        let mut node = Box::new(Border::new(Text::new("x"))).reconcile(None);
        node.arrange(Rect::new(0, 0, 1, 1));

        let mut surface = Surface::new(3, 3);
        let mut ctx = RenderContext::new(&mut surface, &NullTheme);
        node.render(&mut ctx);
        assert!(surface.get(0, 0).unwrap().is_empty());
    }

    #[test]
    fn background_fills_bounds_from_theme() {
        let mut theme = MapTheme::new();
        theme.set("panel.bg", PackedRgba::rgb(9, 9, 9));

        let mut node = Box::new(Background::new("panel.bg", Text::new("a"))).reconcile(None);
        node.arrange(Rect::new(0, 0, 3, 1));

        let mut surface = Surface::new(3, 1);
        let mut ctx = RenderContext::new(&mut surface, &theme);
        node.render(&mut ctx);

        assert_eq!(surface.get(2, 0).unwrap().bg, PackedRgba::rgb(9, 9, 9));
        assert_eq!(surface.get(0, 0).unwrap().content.as_char(), Some('a'));
    }

    #[test]
    fn align_centers_child_within_bounds() {
        let mut node = Box::new(Align::center(Text::new("ab"))).reconcile(None);
        node.arrange(Rect::new(0, 0, 10, 3));
        assert_eq!(node.children()[0].state().bounds, Rect::new(4, 1, 2, 1));
    }

    #[test]
    fn align_clamps_offset_for_oversized_child() {
        let mut node = Box::new(
            Align::new(Text::new("this is far too long"))
                .horizontal(Alignment::End)
                .vertical(Alignment::End),
        )
        .reconcile(None);
        node.arrange(Rect::new(2, 2, 4, 1));
        let child = node.children()[0].state().bounds;
        assert_eq!((child.x, child.y), (2, 2));
    }

    #[test]
    fn panel_clips_its_subtree() {
        let mut node =
            Box::new(Panel::new(Text::new("overflowing content here"))).reconcile(None);
        node.arrange(Rect::new(0, 0, 6, 3));

        let mut surface = Surface::new(12, 3);
        let mut ctx = RenderContext::new(&mut surface, &NullTheme);
        node.render(&mut ctx);

        // Text confined to the 4-column interior.
        assert_eq!(surface.get(1, 1).unwrap().content.as_char(), Some('o'));
        assert_eq!(surface.get(4, 1).unwrap().content.as_char(), Some('r'));
        assert_eq!(surface.get(5, 1).unwrap().content.as_char(), Some('│'));
        assert!(surface.get(6, 1).unwrap().is_empty());
    }

    #[test]
    fn decorator_reuse_preserves_child_node() {
        let node = Box::new(Padding::new(1u16, Text::new("before"))).reconcile(None);
        let mut node = Box::new(Padding::new(2u16, Text::new("after"))).reconcile(Some(node));

        let padded = node
            .as_any_mut()
            .downcast_mut::<super::PaddingNode>()
            .expect("same kind reuses the node");
        assert_eq!(padded.sides, weft_core::Sides::all(2));
        let text = padded.child.as_any().downcast_ref::<crate::text::TextNode>();
        assert_eq!(text.map(|t| t.content()), Some("after"));
    }
}
