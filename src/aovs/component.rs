// Copyright @yucwang 2026

use crate::core::aov::{generate_aov_id, AOV};
use crate::core::aov_accumulator::{AOVAccumulator, ColorAOVAccumulator};
use crate::core::frame::Frame;
use crate::core::lighting::LightingConditions;
use crate::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult};
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// One split of the beauty image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingComponent {
    Diffuse,
    Glossy,
    Volume,
    Emission,
}

impl ShadingComponent {
    pub fn name(&self) -> &'static str {
        match self {
            ShadingComponent::Diffuse => "diffuse",
            ShadingComponent::Glossy => "glossy",
            ShadingComponent::Volume => "volume",
            ShadingComponent::Emission => "emission",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "diffuse" => Some(ShadingComponent::Diffuse),
            "glossy" => Some(ShadingComponent::Glossy),
            "volume" => Some(ShadingComponent::Volume),
            "emission" => Some(ShadingComponent::Emission),
            _ => None,
        }
    }

    fn select<'a>(&self, components: &'a ShadingComponents) -> &'a RGBSpectrum {
        match self {
            ShadingComponent::Diffuse => &components.diffuse,
            ShadingComponent::Glossy => &components.glossy,
            ShadingComponent::Volume => &components.volume,
            ShadingComponent::Emission => &components.emission,
        }
    }
}

pub struct ComponentAOV {
    id: String,
    component: ShadingComponent,
}

impl ComponentAOV {
    pub fn new(component: ShadingComponent, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_aov_id("ComponentAOV")),
            component,
        }
    }
}

impl AOV for ComponentAOV {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.component.name()
    }

    fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator> {
        Box::new(ComponentAOVAccumulator::new(index, self.component))
    }

    fn describe(&self) -> String {
        format!("ComponentAOV [id={}, component={}]", self.id, self.component.name())
    }
}

/// Mirrors the beauty accumulator for a single component: the last write
/// of the pixel wins. Color conversion follows the current tile's frame.
pub struct ComponentAOVAccumulator {
    color: ColorAOVAccumulator,
    component: ShadingComponent,
    lighting_conditions: LightingConditions,
}

impl ComponentAOVAccumulator {
    pub fn new(index: usize, component: ShadingComponent) -> Self {
        Self {
            color: ColorAOVAccumulator::new(index),
            component,
            lighting_conditions: LightingConditions::standard(),
        }
    }
}

impl AOVAccumulator for ComponentAOVAccumulator {
    fn name(&self) -> &'static str {
        self.component.name()
    }

    fn index(&self) -> usize {
        self.color.index()
    }

    fn on_tile_begin(&mut self, frame: &Frame, _tile_x: usize, _tile_y: usize) {
        self.lighting_conditions = *frame.lighting_conditions();
    }

    fn on_pixel_begin(&mut self) {
        self.color.reset();
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             _shading_point: &ShadingPoint,
             shading_components: &ShadingComponents,
             multiplier: Float) {
        let value = self.component.select(shading_components);
        self.color.set_color(value.to_rgb(&self.lighting_conditions) * multiplier);
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        self.color.flush(result);
    }
}
