#![forbid(unsafe_code)]

//! Layered surface composition.
//!
//! A [`CompositeSurface`] owns an ordered list of layers and flattens
//! them bottom-to-top into a single cell grid. For each cell the topmost
//! written value wins; unwritten and continuation cells never paint over
//! an occupied cell.

use crate::cell::Cell;
use crate::surface::Surface;
use weft_core::Rect;

/// A callback that paints into a fresh surface sized like the composite.
pub type PaintFn = Box<dyn Fn(&mut Surface)>;

/// A pure per-cell function of the flattened cells beneath a layer.
///
/// Receives the absolute (x, y) and the cell accumulated so far; returns
/// the derived cell. Returning an unwritten cell leaves the position
/// untouched.
pub type ComputeFn = Box<dyn Fn(u16, u16, &Cell) -> Cell>;

/// One layer of a composite.
pub enum Layer {
    /// A static source surface placed at an offset.
    Source {
        /// The layer's cells.
        surface: Surface,
        /// Horizontal offset in the composite.
        x: u16,
        /// Vertical offset in the composite.
        y: u16,
    },
    /// A callback that paints directly into a fresh same-sized surface.
    Painted(PaintFn),
    /// A layer derived cell-by-cell from whatever lies beneath it.
    Computed(ComputeFn),
}

impl core::fmt::Debug for Layer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Layer::Source { surface, x, y } => f
                .debug_struct("Layer::Source")
                .field("width", &surface.width())
                .field("height", &surface.height())
                .field("x", x)
                .field("y", y)
                .finish(),
            Layer::Painted(_) => f.write_str("Layer::Painted(..)"),
            Layer::Computed(_) => f.write_str("Layer::Computed(..)"),
        }
    }
}

/// An ordered stack of layers over a fixed-size grid.
#[derive(Debug)]
pub struct CompositeSurface {
    width: u16,
    height: u16,
    layers: Vec<Layer>,
}

impl CompositeSurface {
    /// Create an empty composite of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Composite width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Composite height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of layers.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Push a source surface layer at (x, y). Later pushes stack on top.
    pub fn push_source(&mut self, surface: Surface, x: u16, y: u16) {
        self.layers.push(Layer::Source { surface, x, y });
    }

    /// Push a painted layer: the callback draws into a fresh surface the
    /// size of the composite.
    pub fn push_painted(&mut self, paint: impl Fn(&mut Surface) + 'static) {
        self.layers.push(Layer::Painted(Box::new(paint)));
    }

    /// Push a computed layer: each cell is derived from the flattened
    /// cells beneath it.
    pub fn push_computed(&mut self, compute: impl Fn(u16, u16, &Cell) -> Cell + 'static) {
        self.layers.push(Layer::Computed(Box::new(compute)));
    }

    /// Flatten all layers bottom-to-top into a single surface.
    pub fn flatten(&self) -> Surface {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "composite_flatten",
            width = self.width,
            height = self.height,
            layers = self.layers.len()
        )
        .entered();

        let full = Rect::from_size(self.width, self.height);
        let mut out = Surface::new(self.width, self.height);

        for layer in &self.layers {
            match layer {
                Layer::Source { surface, x, y } => {
                    out.composite_from(surface, *x, *y, full);
                }
                Layer::Painted(paint) => {
                    let mut scratch = Surface::new(self.width, self.height);
                    paint(&mut scratch);
                    out.composite_from(&scratch, 0, 0, full);
                }
                Layer::Computed(compute) => {
                    for y in 0..self.height {
                        for x in 0..self.width {
                            let below = match out.get(x, y) {
                                Some(c) => *c,
                                None => continue,
                            };
                            if below.is_continuation() {
                                continue;
                            }
                            let derived = compute(x, y, &below);
                            if !derived.is_empty() {
                                out.set(x, y, derived);
                            }
                        }
                    }
                }
            }
        }

        out
    }
}
