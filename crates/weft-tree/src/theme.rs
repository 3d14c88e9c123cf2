#![forbid(unsafe_code)]

//! Theme lookup boundary.
//!
//! Color and style resolution is an external subsystem; this crate only
//! asks it for colors by key and never hardcodes values.

use std::collections::HashMap;
use weft_render::cell::PackedRgba;

/// Opaque key -> color lookup supplied by the host application.
pub trait Theme {
    fn color(&self, key: &str) -> Option<PackedRgba>;
}

/// A theme that resolves nothing. Nodes fall back to the ambient colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTheme;

impl Theme for NullTheme {
    fn color(&self, _key: &str) -> Option<PackedRgba> {
        None
    }
}

/// A simple map-backed theme, mainly for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct MapTheme {
    colors: HashMap<String, PackedRgba>,
}

impl MapTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, color: PackedRgba) -> &mut Self {
        self.colors.insert(key.into(), color);
        self
    }
}

impl Theme for MapTheme {
    fn color(&self, key: &str) -> Option<PackedRgba> {
        self.colors.get(key).copied()
    }
}
