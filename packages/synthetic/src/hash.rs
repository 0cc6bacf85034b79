//! Coordinate-seeded deterministic hash.

/// Returns a reproducible pseudo-random fraction in `[0, 1)` derived from
/// a coordinate pair and a seed.
///
/// This is the classic shader one-liner
/// `frac(sin(lat·12.9898 + lon·78.233 + seed) · 43758.5453)`. The exact
/// constants are load-bearing: stored synthetic values and cached
/// fallback responses were produced with them, so changing the formula
/// changes every generated value.
///
/// Identical inputs always produce bit-identical output; there is no
/// hidden state and no clock involved.
#[must_use]
pub fn seeded_fraction(latitude: f64, longitude: f64, seed: f64) -> f64 {
    let x = (latitude * 12.989_8 + longitude * 78.233 + seed).sin() * 43_758.545_3;
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_hash_to_zero() {
        // sin(0) = 0 exactly, so the origin is a fixed point.
        assert!((seeded_fraction(0.0, 0.0, 0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn output_stays_in_unit_interval() {
        let coords = [
            (51.5, -0.1),
            (-33.9, 151.2),
            (78.2, 15.6),
            (-54.8, -68.3),
            (0.0, 180.0),
        ];
        for (lat, lon) in coords {
            for seed in [0.0, 123.0, 999.0] {
                let v = seeded_fraction(lat, lon, seed);
                assert!((0.0..1.0).contains(&v), "({lat}, {lon}, {seed}) -> {v}");
            }
        }
    }

    #[test]
    fn identical_inputs_are_bit_identical() {
        let a = seeded_fraction(19.1, 72.9, 431.0);
        let b = seeded_fraction(19.1, 72.9, 431.0);
        assert!((a - b).abs() < f64::EPSILON);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn seed_perturbs_output() {
        let a = seeded_fraction(51.5, -0.1, 100.0);
        let b = seeded_fraction(51.5, -0.1, 101.0);
        assert!((a - b).abs() > 1e-9);
    }
}
