// Copyright @yucwang 2026

use crate::core::aov::{generate_aov_id, AOV};
use crate::core::aov_accumulator::AOVAccumulator;
use crate::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult};
use crate::math::constants::{Float, Vector3f};

pub struct DepthAOV {
    id: String,
}

impl DepthAOV {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_aov_id("DepthAOV")),
        }
    }
}

impl AOV for DepthAOV {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "depth"
    }

    fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator> {
        Box::new(DepthAOVAccumulator::new(index))
    }
}

/// Nearest hit distance over the pixel's samples. Tracks its own coverage:
/// alpha is 1 when any sample hit, 0 otherwise.
pub struct DepthAOVAccumulator {
    index: usize,
    depth: Float,
}

impl DepthAOVAccumulator {
    pub fn new(index: usize) -> Self {
        Self { index, depth: Float::INFINITY }
    }
}

impl AOVAccumulator for DepthAOVAccumulator {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn index(&self) -> usize {
        self.index
    }

    fn on_pixel_begin(&mut self) {
        self.depth = Float::INFINITY;
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             shading_point: &ShadingPoint,
             _shading_components: &ShadingComponents,
             _multiplier: Float) {
        if shading_point.hit {
            self.depth = self.depth.min(shading_point.distance);
        }
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        let slot = &mut result.aovs[self.index];
        if self.depth.is_finite() {
            slot.rgb = Vector3f::new(self.depth, self.depth, self.depth);
            slot.a = 1.0;
        } else {
            slot.rgb = Vector3f::zeros();
            slot.a = 0.0;
        }
    }
}
