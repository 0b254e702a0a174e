//! Multi-octave coherent noise used to decide whether a terrain layer is
//! present at a position.

use noise::{BasicMulti, MultiFractal, NoiseFn, Simplex};

/// Linearly remaps `value` from `[from_min, from_max]` to `[to_min, to_max]`.
///
/// Not clamped. A zero-width source range maps everything to `to_min`.
pub fn remap(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let span = from_max - from_min;
    if span == 0.0 {
        return to_min;
    }
    (value - from_min) / span * (to_max - to_min) + to_min
}

/// A seeded multifractal simplex noise field over the 2D tile plane.
pub struct NoiseField {
    noise: BasicMulti<Simplex>,
    seed: u32,
}

impl NoiseField {
    /// Creates a field with the given seed, octave count and base frequency.
    pub fn new(seed: u32, octaves: u32, frequency: f64) -> Self {
        let noise = BasicMulti::<Simplex>::new(seed)
            .set_octaves(octaves.max(1) as usize)
            .set_frequency(frequency);
        Self { noise, seed }
    }

    /// Seed this field was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw noise at `(x, y)`, clamped to `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Noise at `(x, y)` remapped to `[0, 1]`.
    pub fn normalized(&self, x: f64, y: f64) -> f64 {
        remap(self.sample(x, y), -1.0, 1.0, 0.0, 1.0).clamp(0.0, 1.0)
    }

    /// Returns `true` if the layer is present at `(x, y)` for the given threshold.
    ///
    /// A threshold of `0.0` never places anything; `1.0` places almost everywhere.
    pub fn is_present(&self, x: f64, y: f64, threshold: f64) -> bool {
        self.normalized(x, y) > 1.0 - threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_endpoints() {
        assert_eq!(remap(-1.0, -1.0, 1.0, 0.0, 1.0), 0.0);
        assert_eq!(remap(1.0, -1.0, 1.0, 0.0, 1.0), 1.0);
        assert_eq!(remap(0.0, -1.0, 1.0, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_remap_zero_span() {
        assert_eq!(remap(3.0, 2.0, 2.0, 5.0, 9.0), 5.0);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = NoiseField::new(100, 3, 0.08);
        let b = NoiseField::new(100, 3, 0.08);
        for i in -50..50 {
            let x = i as f64 * 1.3;
            let y = -(i as f64) * 0.7;
            assert_eq!(a.sample(x, y), b.sample(x, y), "Mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn test_sample_in_range() {
        let field = NoiseField::new(7, 6, 0.5);
        for x in -40..40 {
            for y in -40..0 {
                let v = field.sample(x as f64, y as f64);
                assert!((-1.0..=1.0).contains(&v), "sample out of range: {v}");
                let n = field.normalized(x as f64, y as f64);
                assert!((0.0..=1.0).contains(&n), "normalized out of range: {n}");
            }
        }
    }

    #[test]
    fn test_threshold_extremes() {
        let field = NoiseField::new(3, 3, 0.1);
        for x in 0..30 {
            assert!(
                !field.is_present(x as f64, -5.0, 0.0),
                "Zero threshold must never place a tile"
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1, 3, 0.1);
        let b = NoiseField::new(2, 3, 0.1);
        let differs = (0..100).any(|i| a.sample(i as f64 * 0.9, -3.3) != b.sample(i as f64 * 0.9, -3.3));
        assert!(differs, "Different seeds should produce different fields");
    }
}
