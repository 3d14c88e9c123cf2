#![forbid(unsafe_code)]

//! Render context: the services a node consumes while painting.
//!
//! Bundles the target surface, the clip stack for the currently
//! rendering subtree, inherited foreground/background color stacks, the
//! mouse position, and the theme handle. Writes go through the clip
//! stack so a node can never paint outside its providers' regions.

use weft_core::Rect;
use weft_render::ansi::{Segment, segments};
use weft_render::cell::{Cell, PackedRgba, StyleFlags};
use weft_render::clip::{ClipMode, ClipStack};
use weft_render::surface::Surface;

use crate::theme::Theme;

pub struct RenderContext<'a> {
    surface: &'a mut Surface,
    /// Clip chain for the subtree being rendered. Providers push on
    /// entry and pop on exit.
    pub clip: ClipStack,
    theme: &'a dyn Theme,
    fg: Vec<PackedRgba>,
    bg: Vec<PackedRgba>,
    mouse: Option<(u16, u16)>,
}

impl<'a> RenderContext<'a> {
    pub fn new(surface: &'a mut Surface, theme: &'a dyn Theme) -> Self {
        Self {
            surface,
            clip: ClipStack::new(),
            theme,
            fg: Vec::new(),
            bg: Vec::new(),
            mouse: None,
        }
    }

    #[inline]
    pub fn theme(&self) -> &'a dyn Theme {
        self.theme
    }

    /// Resolve a theme color by key.
    #[inline]
    pub fn theme_color(&self, key: &str) -> Option<PackedRgba> {
        self.theme.color(key)
    }

    /// Current inherited foreground color.
    pub fn fg(&self) -> PackedRgba {
        self.fg.last().copied().unwrap_or(PackedRgba::TRANSPARENT)
    }

    /// Current inherited background color.
    pub fn bg(&self) -> PackedRgba {
        self.bg.last().copied().unwrap_or(PackedRgba::TRANSPARENT)
    }

    pub fn push_fg(&mut self, color: PackedRgba) {
        self.fg.push(color);
    }

    pub fn pop_fg(&mut self) {
        self.fg.pop();
    }

    pub fn push_bg(&mut self, color: PackedRgba) {
        self.bg.push(color);
    }

    pub fn pop_bg(&mut self) {
        self.bg.pop();
    }

    /// Mouse position in absolute surface coordinates, if known.
    #[inline]
    pub fn mouse(&self) -> Option<(u16, u16)> {
        self.mouse
    }

    pub fn set_mouse(&mut self, mouse: Option<(u16, u16)>) {
        self.mouse = mouse;
    }

    /// Write a line of text, clipped by the current clip chain.
    ///
    /// The text may carry embedded style-control sequences; they are used
    /// for column accounting only and are never written into cells
    /// (styling on the surface comes from the color stacks).
    pub fn write_clipped(&mut self, x: u16, y: u16, text: &str) {
        self.write_clipped_styled(x, y, text, StyleFlags::empty());
    }

    /// [`Self::write_clipped`] with explicit style attributes.
    pub fn write_clipped_styled(&mut self, x: u16, y: u16, text: &str, attrs: StyleFlags) {
        let Some((start, clipped)) = self.clip.clip_line(x, y, text) else {
            return;
        };
        let fg = self.fg();
        let bg = self.bg();
        let mut cx = start;
        for seg in segments(&clipped) {
            if let Segment::Grapheme { cluster, .. } = seg {
                cx = self.surface.write_str(cx, y, cluster, fg, bg, attrs);
            }
        }
    }

    /// Write a single cell if the clip chain admits its position.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if self.clip.should_render_at(x, y) {
            self.surface.set(x, y, cell);
        }
    }

    /// Fill a region with a cell, restricted to the effective clip rect.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let target = if self.clip.allows_overflow() {
            rect
        } else {
            match self.clip.effective_rect() {
                Some(clip) => rect.intersection(&clip),
                None => rect,
            }
        };
        self.surface.fill(target, cell);
    }

    /// Erase a region to blank cells carrying the ambient background.
    pub fn erase(&mut self, rect: Rect) {
        let cell = Cell::from_char(' ').with_bg(self.bg());
        self.fill(rect, cell);
    }

    /// Composite a surface into the target at (x, y), clipped by the
    /// effective clip rect in target coordinates.
    pub fn composite(&mut self, src: &Surface, x: u16, y: u16) {
        let clip = if self.clip.allows_overflow() {
            self.surface.bounds()
        } else {
            self.clip
                .effective_rect()
                .unwrap_or_else(|| self.surface.bounds())
        };
        self.surface.composite_from(src, x, y, clip);
    }

    /// Render into a fresh offscreen surface of the given size.
    ///
    /// `origin` is the offscreen surface's position in absolute
    /// coordinates; the ambient clip rectangle and mouse position are
    /// translated into the offscreen's local space by subtracting it, so
    /// outer clipping still holds for whatever renders inside.
    pub fn offscreen(
        &mut self,
        width: u16,
        height: u16,
        origin: (u16, u16),
        f: impl FnOnce(&mut RenderContext<'_>),
    ) -> Surface {
        let mut surface = Surface::new(width, height);
        let mut clip = ClipStack::new();
        if !self.clip.allows_overflow()
            && let Some(rect) = self.clip.effective_rect()
        {
            let absolute = Rect::new(origin.0, origin.1, width, height);
            let visible = rect.intersection(&absolute);
            clip.push(
                Rect::new(
                    visible.x.saturating_sub(origin.0),
                    visible.y.saturating_sub(origin.1),
                    visible.width,
                    visible.height,
                ),
                ClipMode::Clip,
            );
        }
        let mut local = RenderContext {
            surface: &mut surface,
            clip,
            theme: self.theme,
            fg: self.fg.clone(),
            bg: self.bg.clone(),
            mouse: self
                .mouse
                .map(|(mx, my)| (mx.saturating_sub(origin.0), my.saturating_sub(origin.1))),
        };
        f(&mut local);
        surface
    }
}
