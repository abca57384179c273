// Copyright @yucwang 2026

use crate::math::constants::{Matrix3f, Vector3f};

/// Color conversion settings handed to accumulators that produce
/// display-space colors. Working space is linear Rec.709 unless a
/// preset says otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConditions {
    working_to_display: Matrix3f,
}

impl Default for LightingConditions {
    fn default() -> Self {
        Self::standard()
    }
}

impl LightingConditions {
    pub fn new(working_to_display: Matrix3f) -> Self {
        Self { working_to_display }
    }

    /// Linear Rec.709 in, linear Rec.709 out.
    pub fn standard() -> Self {
        Self::new(Matrix3f::identity())
    }

    pub fn rec2020_to_rec709() -> Self {
        Self::new(Matrix3f::new(
             1.660491, -0.587641, -0.072850,
            -0.124550,  1.132900, -0.008349,
            -0.018151, -0.100579,  1.118730,
        ))
    }

    pub fn xyz_to_rec709() -> Self {
        Self::new(Matrix3f::new(
             3.240970, -1.537383, -0.498611,
            -0.969244,  1.875968,  0.041555,
             0.055630, -0.203977,  1.056972,
        ))
    }

    pub fn working_to_display(&self) -> &Matrix3f {
        &self.working_to_display
    }

    pub fn to_display(&self, rgb: &Vector3f) -> Vector3f {
        self.working_to_display * rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "expected {} ~ {}", a, b);
    }

    #[test]
    fn test_standard_is_identity() {
        let v = Vector3f::new(0.1, 0.2, 0.3);
        assert_eq!(LightingConditions::standard().to_display(&v), v);
        assert_eq!(LightingConditions::default(), LightingConditions::standard());
    }

    #[test]
    fn test_rec2020_preserves_white() {
        let white = LightingConditions::rec2020_to_rec709().to_display(&Vector3f::new(1.0, 1.0, 1.0));
        assert_close(white.x, 1.0);
        assert_close(white.y, 1.0);
        assert_close(white.z, 1.0);
    }

    #[test]
    fn test_xyz_d65_white_maps_to_rgb_white() {
        let d65 = Vector3f::new(0.95047, 1.0, 1.08883);
        let white = LightingConditions::xyz_to_rec709().to_display(&d65);
        assert_close(white.x, 1.0);
        assert_close(white.y, 1.0);
        assert_close(white.z, 1.0);
    }
}
