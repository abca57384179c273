// Copyright @yucwang 2026

use crate::core::aov::{generate_aov_id, AOV};
use crate::core::aov_accumulator::{AOVAccumulator, ColorAOVAccumulator};
use crate::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult};
use crate::math::constants::{Float, Vector3f};

pub struct NormalAOV {
    id: String,
}

impl NormalAOV {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_aov_id("NormalAOV")),
        }
    }
}

impl AOV for NormalAOV {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "normal"
    }

    fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator> {
        Box::new(NormalAOVAccumulator::new(index))
    }
}

/// Mean shading normal over the pixel's hit samples, remapped from
/// [-1, 1] to [0, 1]. Pixels without a hit stay black.
pub struct NormalAOVAccumulator {
    color: ColorAOVAccumulator,
    sum: Vector3f,
    hits: u32,
}

impl NormalAOVAccumulator {
    pub fn new(index: usize) -> Self {
        Self { color: ColorAOVAccumulator::new(index), sum: Vector3f::zeros(), hits: 0 }
    }
}

impl AOVAccumulator for NormalAOVAccumulator {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn index(&self) -> usize {
        self.color.index()
    }

    fn on_pixel_begin(&mut self) {
        self.sum = Vector3f::zeros();
        self.hits = 0;
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             shading_point: &ShadingPoint,
             _shading_components: &ShadingComponents,
             _multiplier: Float) {
        if shading_point.hit {
            self.sum += shading_point.sh_normal;
            self.hits += 1;
        }
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        let color = if self.hits == 0 {
            Vector3f::zeros()
        } else {
            match (self.sum / self.hits as Float).try_normalize(1e-12) {
                Some(n) => (n + Vector3f::new(1.0, 1.0, 1.0)) * 0.5,
                None => Vector3f::zeros(),
            }
        };
        self.color.set_color(color);
        self.color.flush(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{Vector2f, Vector2i};

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "expected {} ~ {}", a, b);
    }

    fn hit(normal: Vector3f) -> ShadingPoint {
        ShadingPoint::new(Vector3f::zeros(), normal, normal, Vector2f::new(0.0, 0.0), 1.0)
    }

    #[test]
    fn test_normal_is_remapped() {
        let mut accumulator = NormalAOV::new(None).create_accumulator(0);
        let ctx = PixelContext::new(Vector2i::new(0, 0), Vector2f::new(0.5, 0.5));
        let components = ShadingComponents::default();

        accumulator.on_pixel_begin();
        accumulator.write(&ctx, &hit(Vector3f::new(0.0, 0.0, 1.0)), &components, 1.0);
        accumulator.write(&ctx, &ShadingPoint::miss(), &components, 1.0);

        let mut result = ShadingResult::default();
        result.main.a = 0.5;
        accumulator.flush(&mut result);
        assert_close(result.aovs[0].rgb.x, 0.5);
        assert_close(result.aovs[0].rgb.y, 0.5);
        assert_close(result.aovs[0].rgb.z, 1.0);
        assert_eq!(result.aovs[0].a, 0.5);
    }

    #[test]
    fn test_normals_are_averaged() {
        let mut accumulator = NormalAOVAccumulator::new(1);
        let ctx = PixelContext::new(Vector2i::new(0, 0), Vector2f::new(0.5, 0.5));
        let components = ShadingComponents::default();

        accumulator.on_pixel_begin();
        accumulator.write(&ctx, &hit(Vector3f::new(1.0, 0.0, 0.0)), &components, 1.0);
        accumulator.write(&ctx, &hit(Vector3f::new(0.0, 1.0, 0.0)), &components, 1.0);

        let mut result = ShadingResult::default();
        accumulator.flush(&mut result);
        let expected = (0.5f32.sqrt() + 1.0) * 0.5;
        assert_close(result.aovs[1].rgb.x, expected);
        assert_close(result.aovs[1].rgb.y, expected);
        assert_close(result.aovs[1].rgb.z, 0.5);
    }

    #[test]
    fn test_miss_only_pixel_is_black() {
        let mut accumulator = NormalAOVAccumulator::new(0);
        let ctx = PixelContext::new(Vector2i::new(0, 0), Vector2f::new(0.5, 0.5));
        accumulator.on_pixel_begin();
        accumulator.write(&ctx, &ShadingPoint::miss(), &ShadingComponents::default(), 1.0);

        let mut result = ShadingResult::default();
        accumulator.flush(&mut result);
        assert_eq!(result.aovs[0].rgb, Vector3f::zeros());
    }
}
