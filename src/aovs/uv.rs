// Copyright @yucwang 2026

use crate::core::aov::{generate_aov_id, AOV};
use crate::core::aov_accumulator::{AOVAccumulator, ColorAOVAccumulator};
use crate::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult};
use crate::math::constants::{Float, Vector2f, Vector3f};

pub struct UVAOV {
    id: String,
}

impl UVAOV {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_aov_id("UVAOV")),
        }
    }
}

impl AOV for UVAOV {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "uv"
    }

    fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator> {
        Box::new(UVAOVAccumulator::new(index))
    }
}

/// Mean surface parameterization `(u, v, 0)` over the pixel's hit samples.
pub struct UVAOVAccumulator {
    color: ColorAOVAccumulator,
    sum: Vector2f,
    hits: u32,
}

impl UVAOVAccumulator {
    pub fn new(index: usize) -> Self {
        Self { color: ColorAOVAccumulator::new(index), sum: Vector2f::new(0.0, 0.0), hits: 0 }
    }
}

impl AOVAccumulator for UVAOVAccumulator {
    fn name(&self) -> &'static str {
        "uv"
    }

    fn index(&self) -> usize {
        self.color.index()
    }

    fn on_pixel_begin(&mut self) {
        self.sum = Vector2f::new(0.0, 0.0);
        self.hits = 0;
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             shading_point: &ShadingPoint,
             _shading_components: &ShadingComponents,
             _multiplier: Float) {
        if shading_point.hit {
            self.sum += shading_point.uv;
            self.hits += 1;
        }
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        let color = if self.hits == 0 {
            Vector3f::zeros()
        } else {
            let uv = self.sum / self.hits as Float;
            Vector3f::new(uv.x, uv.y, 0.0)
        };
        self.color.set_color(color);
        self.color.flush(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2i;

    #[test]
    fn test_uv_average_of_hits() {
        let mut accumulator = UVAOV::new(None).create_accumulator(3);
        let ctx = PixelContext::new(Vector2i::new(1, 1), Vector2f::new(1.5, 1.5));
        let components = ShadingComponents::default();
        let p = Vector3f::zeros();
        let n = Vector3f::new(0.0, 0.0, 1.0);

        accumulator.on_pixel_begin();
        accumulator.write(&ctx, &ShadingPoint::new(p, n, n, Vector2f::new(0.25, 0.5), 1.0), &components, 1.0);
        accumulator.write(&ctx, &ShadingPoint::new(p, n, n, Vector2f::new(0.75, 1.0), 1.0), &components, 1.0);
        accumulator.write(&ctx, &ShadingPoint::miss(), &components, 1.0);

        let mut result = ShadingResult::default();
        result.main.a = 1.0;
        accumulator.flush(&mut result);
        assert_eq!(result.aovs[3].rgb, Vector3f::new(0.5, 0.75, 0.0));
        assert_eq!(result.aovs[3].a, 1.0);
    }
}
