// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

/// Small LCG for sample jittering; not meant for anything statistical.
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Decorrelated stream per pixel, so tiles can be rendered in any order.
    pub fn for_pixel(seed: u64, x: usize, y: usize) -> Self {
        Self::new(((seed & 0xFFF) << 32) | (((y as u64) & 0xFFFF) << 16) | ((x as u64) & 0xFFFF))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float / (1u32 << 24) as Float
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let u = self.next_f32();
        let v = self.next_f32();
        Vector2f::new(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::LcgRng;

    #[test]
    fn test_samples_in_unit_interval() {
        let mut rng = LcgRng::new(7);
        for _ in 0..1000 {
            let u = rng.next_f32();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_pixel_streams_are_reproducible_and_distinct() {
        let mut a = LcgRng::for_pixel(1, 10, 20);
        let mut b = LcgRng::for_pixel(1, 10, 20);
        let mut c = LcgRng::for_pixel(1, 11, 20);
        let first = a.next_u32();
        assert_eq!(first, b.next_u32());
        assert_ne!(first, c.next_u32());
    }
}
