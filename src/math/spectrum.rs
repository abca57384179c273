// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use crate::core::lighting::LightingConditions;

use std::ops;

/// Linear RGB radiance in the renderer's working color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn splat(value: Float) -> Self {
        Self::new(value, value, value)
    }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|c| *c == 0.0)
    }

    pub fn as_vector(&self) -> Vector3f {
        self.rgb
    }

    /// Converts to display RGB under the given lighting conditions.
    pub fn to_rgb(&self, lighting: &LightingConditions) -> Vector3f {
        lighting.to_display(&self.rgb)
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        &self.rgb[index]
    }
}

impl ops::Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb + rhs.rgb }
    }
}

impl ops::AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb += rhs.rgb;
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb * rhs }
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb.component_mul(&rhs.rgb) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_black() {
        assert!(RGBSpectrum::default().is_black());
        assert!(!RGBSpectrum::new(0.0, 0.1, 0.0).is_black());
    }

    #[test]
    fn test_arithmetic() {
        let a = RGBSpectrum::new(1.0, 2.0, 3.0);
        let b = RGBSpectrum::splat(2.0);
        assert_eq!(a + b, RGBSpectrum::new(3.0, 4.0, 5.0));
        assert_eq!(a * b, RGBSpectrum::new(2.0, 4.0, 6.0));
        assert_eq!(a * 0.5, RGBSpectrum::new(0.5, 1.0, 1.5));
        assert_eq!(a[2], 3.0);
    }

    #[test]
    fn test_to_rgb_standard_is_identity() {
        let s = RGBSpectrum::new(0.25, 0.5, 0.75);
        let rgb = s.to_rgb(&LightingConditions::standard());
        assert_eq!(rgb, Vector3f::new(0.25, 0.5, 0.75));
    }
}
