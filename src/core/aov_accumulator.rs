// Copyright @yucwang 2026

use crate::core::aov::{AOVContainer, AOVError};
use crate::core::frame::Frame;
use crate::core::lighting::LightingConditions;
use crate::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult, MAX_AOV_COUNT};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Channel index reserved for accumulators that target the main image.
pub const MAIN_CHANNEL_INDEX: usize = usize::MAX;

/// Beauty and alpha plus one accumulator per possible extra channel.
pub const DEFAULT_MAX_AOV_ACCUMULATORS: usize = MAX_AOV_COUNT + 2;

/// Per-channel state machine driven once per tile, pixel and sample.
///
/// Every hook is a no-op by default; a channel overrides only what it
/// needs. `write` runs on the per-sample path and must not allocate.
pub trait AOVAccumulator: Send {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Target channel in `ShadingResult::aovs`, or `MAIN_CHANNEL_INDEX`.
    fn index(&self) -> usize;

    fn on_tile_begin(&mut self, _frame: &Frame, _tile_x: usize, _tile_y: usize) {}

    fn on_tile_end(&mut self, _frame: &Frame, _tile_x: usize, _tile_y: usize) {}

    fn on_pixel_begin(&mut self) {}

    fn on_pixel_end(&mut self) {}

    fn on_sample_begin(&mut self) {}

    fn on_sample_end(&mut self) {}

    fn write(&mut self,
             _pixel_context: &PixelContext,
             _shading_point: &ShadingPoint,
             _shading_components: &ShadingComponents,
             _multiplier: Float) {}

    /// Commits the pixel's state. Called once per pixel, after its samples.
    fn flush(&mut self, result: &mut ShadingResult);

    /// Destroys the accumulator. Only the owning container calls this.
    fn release(self: Box<Self>) {}
}

/// Shared state for channels whose value is one RGB color per pixel.
/// The flushed alpha is inherited from the main image.
#[derive(Debug, Clone)]
pub struct ColorAOVAccumulator {
    index: usize,
    color: Vector3f,
}

impl ColorAOVAccumulator {
    pub fn new(index: usize) -> Self {
        Self { index, color: Vector3f::zeros() }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn color(&self) -> Vector3f {
        self.color
    }

    pub fn set_color(&mut self, color: Vector3f) {
        self.color = color;
    }

    pub fn reset(&mut self) {
        self.color = Vector3f::zeros();
    }

    pub fn flush(&self, result: &mut ShadingResult) {
        let main_alpha = result.main.a;
        let slot = &mut result.aovs[self.index];
        slot.rgb = self.color;
        slot.a = main_alpha;
    }
}

impl AOVAccumulator for ColorAOVAccumulator {
    fn index(&self) -> usize {
        self.index
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        ColorAOVAccumulator::flush(self, result);
    }
}

/// Main image color. `write` overwrites; summing several contributions of
/// one sample is the caller's job.
#[derive(Debug, Clone)]
pub struct BeautyAOVAccumulator {
    color: Vector3f,
    lighting_conditions: LightingConditions,
}

impl Default for BeautyAOVAccumulator {
    fn default() -> Self {
        Self::new(LightingConditions::standard())
    }
}

impl BeautyAOVAccumulator {
    pub fn new(lighting_conditions: LightingConditions) -> Self {
        Self { color: Vector3f::zeros(), lighting_conditions }
    }

    pub fn color(&self) -> Vector3f {
        self.color
    }

    pub fn set(&mut self, color: Vector3f) {
        self.color = color;
    }

    pub fn set_spectrum(&mut self, value: &RGBSpectrum) {
        self.color = value.to_rgb(&self.lighting_conditions);
    }

    /// Flat magenta, used to flag pixels that failed to shade.
    pub fn set_to_pink_linear_rgb(&mut self) {
        self.set(Vector3f::new(1.0, 0.0, 1.0));
    }

    pub fn apply_multiplier(&mut self, multiplier: Float) {
        self.color *= multiplier;
    }
}

impl AOVAccumulator for BeautyAOVAccumulator {
    fn name(&self) -> &'static str {
        "beauty"
    }

    fn index(&self) -> usize {
        MAIN_CHANNEL_INDEX
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             _shading_point: &ShadingPoint,
             shading_components: &ShadingComponents,
             multiplier: Float) {
        self.color = shading_components.beauty.to_rgb(&self.lighting_conditions);
        self.color *= multiplier;
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        result.main.rgb = self.color;
    }
}

/// Main image coverage.
#[derive(Debug, Clone, Default)]
pub struct AlphaAOVAccumulator {
    alpha: Float,
}

impl AlphaAOVAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(&self) -> Float {
        self.alpha
    }

    pub fn set(&mut self, alpha: Float) {
        self.alpha = alpha;
    }

    pub fn apply_multiplier(&mut self, multiplier: Float) {
        self.alpha *= multiplier;
    }
}

impl AOVAccumulator for AlphaAOVAccumulator {
    fn name(&self) -> &'static str {
        "alpha"
    }

    fn index(&self) -> usize {
        MAIN_CHANNEL_INDEX
    }

    fn write(&mut self,
             _pixel_context: &PixelContext,
             _shading_point: &ShadingPoint,
             shading_components: &ShadingComponents,
             _multiplier: Float) {
        self.alpha = shading_components.alpha;
    }

    fn flush(&mut self, result: &mut ShadingResult) {
        result.main.a = self.alpha;
    }
}

/// Owns the accumulators of one rendering context and forwards every
/// lifecycle call to them in insertion order. Slot 0 is always beauty and
/// slot 1 always alpha. One container per worker; never shared.
pub struct AOVAccumulatorContainer {
    beauty: BeautyAOVAccumulator,
    alpha: AlphaAOVAccumulator,
    extras: Vec<Box<dyn AOVAccumulator>>,
    capacity: usize,
}

impl Default for AOVAccumulatorContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl AOVAccumulatorContainer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_AOV_ACCUMULATORS)
    }

    /// `capacity` counts the two built-in accumulators.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_lighting_conditions(LightingConditions::standard(), capacity)
    }

    fn with_lighting_conditions(lighting_conditions: LightingConditions, capacity: usize) -> Self {
        debug_assert!(capacity >= 2, "capacity must fit beauty and alpha");
        let capacity = capacity.max(2);
        Self {
            beauty: BeautyAOVAccumulator::new(lighting_conditions),
            alpha: AlphaAOVAccumulator::new(),
            extras: Vec::with_capacity(capacity - 2),
            capacity,
        }
    }

    /// Builds beauty, alpha and one accumulator per AOV of `aovs`.
    /// Channels that do not fit, or whose factory returns an unusable
    /// index, are dropped with a warning. An `AOVContainer` never holds
    /// more than `MAX_AOV_COUNT` descriptors, so with the default capacity
    /// only a misbehaving factory can trigger the drop.
    pub fn with_aovs(aovs: &AOVContainer, lighting_conditions: &LightingConditions) -> Self {
        let mut container = Self::with_lighting_conditions(*lighting_conditions, DEFAULT_MAX_AOV_ACCUMULATORS);
        for (i, aov) in aovs.iter().enumerate() {
            if let Err(err) = container.insert_created(aov.create_accumulator(i), i) {
                log::warn!("Dropping AOV '{}': {}.", aov.name(), err);
            }
        }
        log::debug!("Created AOV accumulator container with {} accumulators.", container.len());
        container
    }

    /// Same as `with_aovs` but fails instead of dropping channels.
    pub fn try_with_aovs(aovs: &AOVContainer,
                         lighting_conditions: &LightingConditions,
                         capacity: usize) -> Result<Self, AOVError> {
        let mut container = Self::with_lighting_conditions(*lighting_conditions, capacity);
        for (i, aov) in aovs.iter().enumerate() {
            container.insert_created(aov.create_accumulator(i), i)?;
        }
        log::debug!("Created AOV accumulator container with {} accumulators.", container.len());
        Ok(container)
    }

    pub fn from_frame(frame: &Frame) -> Self {
        Self::with_aovs(frame.aovs(), frame.lighting_conditions())
    }

    fn insert_created(&mut self, accumulator: Box<dyn AOVAccumulator>, requested: usize) -> Result<(), AOVError> {
        debug_assert_eq!(accumulator.index(), requested, "AOV factory returned a mismatched channel index");
        self.insert(accumulator)
    }

    /// Takes ownership of `accumulator`. The accumulator must target an
    /// extra channel; `MAIN_CHANNEL_INDEX` belongs to the built-ins. A
    /// rejected accumulator is released and an error is returned.
    pub fn insert(&mut self, accumulator: Box<dyn AOVAccumulator>) -> Result<(), AOVError> {
        let index = accumulator.index();
        if index >= MAX_AOV_COUNT {
            accumulator.release();
            return Err(AOVError::InvalidChannelIndex(index));
        }
        debug_assert!(self.extras.iter().all(|a| a.index() != index),
                      "channel index {} already taken", index);

        if self.len() == self.capacity {
            accumulator.release();
            return Err(AOVError::CapacityExceeded { capacity: self.capacity });
        }

        self.extras.push(accumulator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        2 + self.extras.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read-only view of slot `i`.
    pub fn get(&self, i: usize) -> Option<&dyn AOVAccumulator> {
        match i {
            0 => Some(&self.beauty as &dyn AOVAccumulator),
            1 => Some(&self.alpha as &dyn AOVAccumulator),
            _ => self.extras.get(i - 2).map(|a| a.as_ref()),
        }
    }

    pub fn beauty_mut(&mut self) -> &mut BeautyAOVAccumulator {
        &mut self.beauty
    }

    pub fn alpha_mut(&mut self) -> &mut AlphaAOVAccumulator {
        &mut self.alpha
    }

    #[inline]
    fn for_each_mut<F: FnMut(&mut dyn AOVAccumulator)>(&mut self, mut f: F) {
        f(&mut self.beauty);
        f(&mut self.alpha);
        for accumulator in self.extras.iter_mut() {
            f(accumulator.as_mut());
        }
    }

    pub fn on_tile_begin(&mut self, frame: &Frame, tile_x: usize, tile_y: usize) {
        self.for_each_mut(|a| a.on_tile_begin(frame, tile_x, tile_y));
    }

    pub fn on_tile_end(&mut self, frame: &Frame, tile_x: usize, tile_y: usize) {
        self.for_each_mut(|a| a.on_tile_end(frame, tile_x, tile_y));
    }

    pub fn on_pixel_begin(&mut self) {
        self.for_each_mut(|a| a.on_pixel_begin());
    }

    pub fn on_pixel_end(&mut self) {
        self.for_each_mut(|a| a.on_pixel_end());
    }

    pub fn on_sample_begin(&mut self) {
        self.for_each_mut(|a| a.on_sample_begin());
    }

    pub fn on_sample_end(&mut self) {
        self.for_each_mut(|a| a.on_sample_end());
    }

    pub fn write(&mut self,
                 pixel_context: &PixelContext,
                 shading_point: &ShadingPoint,
                 shading_components: &ShadingComponents,
                 multiplier: Float) {
        self.for_each_mut(|a| a.write(pixel_context, shading_point, shading_components, multiplier));
    }

    pub fn flush(&mut self, result: &mut ShadingResult) {
        self.for_each_mut(|a| a.flush(result));
    }
}

impl Drop for AOVAccumulatorContainer {
    fn drop(&mut self) {
        for accumulator in self.extras.drain(..) {
            accumulator.release();
        }
    }
}
