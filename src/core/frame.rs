// Copyright @yucwang 2026

use crate::core::aov::AOVContainer;
use crate::core::lighting::LightingConditions;

pub const DEFAULT_TILE_SIZE: usize = 32;

/// Pixel bounds of a tile, half-open on the max side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl TileBounds {
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }
}

/// Frame-level rendering settings seen by the accumulators.
pub struct Frame {
    width: usize,
    height: usize,
    tile_width: usize,
    tile_height: usize,
    lighting_conditions: LightingConditions,
    aovs: AOVContainer,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            lighting_conditions: LightingConditions::standard(),
            aovs: AOVContainer::new(),
        }
    }

    pub fn with_tile_size(mut self, tile_width: usize, tile_height: usize) -> Self {
        self.tile_width = tile_width.max(1);
        self.tile_height = tile_height.max(1);
        self
    }

    pub fn with_lighting_conditions(mut self, lighting_conditions: LightingConditions) -> Self {
        self.lighting_conditions = lighting_conditions;
        self
    }

    pub fn with_aovs(mut self, aovs: AOVContainer) -> Self {
        self.aovs = aovs;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn lighting_conditions(&self) -> &LightingConditions {
        &self.lighting_conditions
    }

    pub fn aovs(&self) -> &AOVContainer {
        &self.aovs
    }

    pub fn tile_count_x(&self) -> usize {
        (self.width + self.tile_width - 1) / self.tile_width
    }

    pub fn tile_count_y(&self) -> usize {
        (self.height + self.tile_height - 1) / self.tile_height
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count_x() * self.tile_count_y()
    }

    /// Bounds of tile `(tile_x, tile_y)`, clipped to the frame.
    pub fn tile_bounds(&self, tile_x: usize, tile_y: usize) -> TileBounds {
        let x0 = tile_x * self.tile_width;
        let y0 = tile_y * self.tile_height;
        TileBounds {
            x0: x0.min(self.width),
            y0: y0.min(self.height),
            x1: (x0 + self.tile_width).min(self.width),
            y1: (y0 + self.tile_height).min(self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_layout_covers_frame() {
        let frame = Frame::new(100, 40).with_tile_size(32, 32);
        assert_eq!(frame.tile_count_x(), 4);
        assert_eq!(frame.tile_count_y(), 2);
        assert_eq!(frame.tile_count(), 8);

        let mut covered = 0;
        for ty in 0..frame.tile_count_y() {
            for tx in 0..frame.tile_count_x() {
                covered += frame.tile_bounds(tx, ty).pixel_count();
            }
        }
        assert_eq!(covered, 100 * 40);
    }

    #[test]
    fn test_edge_tile_is_clipped() {
        let frame = Frame::new(100, 40).with_tile_size(32, 32);
        let bounds = frame.tile_bounds(3, 1);
        assert_eq!(bounds, TileBounds { x0: 96, y0: 32, x1: 100, y1: 40 });
        assert_eq!(bounds.width(), 4);
        assert_eq!(bounds.height(), 8);
    }

    #[test]
    fn test_defaults() {
        let frame = Frame::new(8, 8);
        assert_eq!(frame.tile_count(), 1);
        assert!(frame.aovs().is_empty());
        assert_eq!(*frame.lighting_conditions(), LightingConditions::standard());
    }
}
