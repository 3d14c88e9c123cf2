#![forbid(unsafe_code)]

//! A single-line text leaf.
//!
//! The simplest self-drawing node; the real widget catalogue lives
//! outside this crate, but a text leaf is needed by the decorators and
//! exercises the clipped-write path end to end.

use std::any::Any;

use weft_core::{Constraints, Rect, Size};
use weft_render::display_width;

use crate::context::RenderContext;
use crate::node::{Node, NodeState};
use crate::reconcile::{Widget, reuse_or_replace};

/// Text widget description.
pub struct Text {
    content: String,
    fg_key: Option<String>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fg_key: None,
        }
    }

    /// Theme key for the foreground color.
    pub fn fg_key(mut self, key: impl Into<String>) -> Self {
        self.fg_key = Some(key.into());
        self
    }
}

impl Widget for Text {
    fn reconcile(self: Box<Self>, prev: Option<Box<dyn Node>>) -> Box<dyn Node> {
        let Text { content, fg_key } = *self;
        let build_content = content.clone();
        let build_fg_key = fg_key.clone();
        reuse_or_replace::<TextNode>(
            prev,
            |node| {
                if node.content != content {
                    node.content = content;
                    node.state.mark_dirty();
                }
                if node.fg_key != fg_key {
                    node.fg_key = fg_key;
                    node.state.mark_dirty();
                }
            },
            move || TextNode {
                state: NodeState::new(),
                content: build_content,
                fg_key: build_fg_key,
            },
        )
    }
}

pub struct TextNode {
    state: NodeState,
    content: String,
    fg_key: Option<String>,
}

impl TextNode {
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Node for TextNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let width = display_width(&self.content).min(u16::MAX as usize) as u16;
        constraints.constrain(Size { width, height: 1 })
    }

    fn arrange(&mut self, bounds: Rect) {
        self.state.set_bounds(bounds);
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let bounds = self.state.bounds;
        if bounds.is_empty() {
            return;
        }
        let color = self.fg_key.as_deref().and_then(|k| ctx.theme_color(k));
        if let Some(fg) = color {
            ctx.push_fg(fg);
        }
        ctx.write_clipped(bounds.x, bounds.y, &self.content);
        if color.is_some() {
            ctx.pop_fg();
        }
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
