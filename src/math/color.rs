// Copyright @yucwang 2026

use super::constants::{Float, Vector3f};

/// RGB color with an alpha (coverage) channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color4f {
    pub rgb: Vector3f,
    pub a: Float,
}

impl Default for Color4f {
    fn default() -> Self {
        Self { rgb: Vector3f::zeros(), a: 0.0 }
    }
}

impl Color4f {
    pub fn new(r: Float, g: Float, b: Float, a: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b), a }
    }

    pub fn to_tuple(&self) -> (Float, Float, Float, Float) {
        (self.rgb.x, self.rgb.y, self.rgb.z, self.a)
    }
}

