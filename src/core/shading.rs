// Copyright @yucwang 2026

use crate::math::color::Color4f;
use crate::math::constants::{Float, Vector2f, Vector2i, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Upper bound on extra output channels carried by a `ShadingResult`.
pub const MAX_AOV_COUNT: usize = 32;

/// Per-pixel addressing token forwarded to accumulators untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelContext {
    pub pixel_coords: Vector2i,
    pub sample_position: Vector2f,
}

impl PixelContext {
    pub fn new(pixel_coords: Vector2i, sample_position: Vector2f) -> Self {
        Self { pixel_coords, sample_position }
    }
}

/// Geometry of the primary hit for one sample. `hit == false` means the
/// camera ray escaped and the remaining fields are meaningless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingPoint {
    pub hit: bool,
    pub p: Vector3f,
    pub geo_normal: Vector3f,
    pub sh_normal: Vector3f,
    pub uv: Vector2f,
    pub distance: Float,
}

impl ShadingPoint {
    pub fn miss() -> Self {
        Self {
            hit: false,
            p: Vector3f::zeros(),
            geo_normal: Vector3f::zeros(),
            sh_normal: Vector3f::zeros(),
            uv: Vector2f::new(0.0, 0.0),
            distance: Float::INFINITY,
        }
    }

    pub fn new(p: Vector3f, geo_normal: Vector3f, sh_normal: Vector3f, uv: Vector2f, distance: Float) -> Self {
        Self { hit: true, p, geo_normal, sh_normal, uv, distance }
    }
}

/// Light transport outcome of one sample, split by scattering component.
/// `beauty` is the sum of the other components as computed upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingComponents {
    pub beauty: RGBSpectrum,
    pub diffuse: RGBSpectrum,
    pub glossy: RGBSpectrum,
    pub volume: RGBSpectrum,
    pub emission: RGBSpectrum,
    pub alpha: Float,
}

impl Default for ShadingComponents {
    fn default() -> Self {
        Self {
            beauty: RGBSpectrum::default(),
            diffuse: RGBSpectrum::default(),
            glossy: RGBSpectrum::default(),
            volume: RGBSpectrum::default(),
            emission: RGBSpectrum::default(),
            alpha: 0.0,
        }
    }
}

impl ShadingComponents {
    pub fn from_beauty(beauty: RGBSpectrum, alpha: Float) -> Self {
        Self { beauty, alpha, ..Self::default() }
    }

    /// Recomputes `beauty` from the component splits.
    pub fn rebuild_beauty(&mut self) {
        self.beauty = self.diffuse + self.glossy + self.volume + self.emission;
    }
}

impl std::ops::AddAssign for ShadingComponents {
    fn add_assign(&mut self, rhs: ShadingComponents) {
        self.beauty += rhs.beauty;
        self.diffuse += rhs.diffuse;
        self.glossy += rhs.glossy;
        self.volume += rhs.volume;
        self.emission += rhs.emission;
        self.alpha += rhs.alpha;
    }
}

/// Output slot of one pixel: the main image plus indexed extra channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingResult {
    pub main: Color4f,
    pub aovs: [Color4f; MAX_AOV_COUNT],
}

impl Default for ShadingResult {
    fn default() -> Self {
        Self {
            main: Color4f::default(),
            aovs: [Color4f::default(); MAX_AOV_COUNT],
        }
    }
}

impl ShadingResult {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_beauty_sums_components() {
        let mut components = ShadingComponents::default();
        components.diffuse = RGBSpectrum::new(0.25, 0.5, 0.75);
        components.glossy = RGBSpectrum::new(0.5, 0.0, 0.0);
        components.emission = RGBSpectrum::splat(1.0);
        components.rebuild_beauty();
        assert_eq!(components.beauty, RGBSpectrum::new(1.75, 1.5, 1.75));
    }

    #[test]
    fn test_result_clear() {
        let mut result = ShadingResult::default();
        result.main = Color4f::new(1.0, 1.0, 1.0, 1.0);
        result.aovs[3].a = 0.5;
        result.clear();
        assert_eq!(result, ShadingResult::default());
    }
}
