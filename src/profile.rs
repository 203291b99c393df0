use rand::Rng;

use crate::error::{NebulaError, NebulaResult};

/// Position-dependent amplitude scale giving a wave its non-uniform
/// silhouette. `segments + 1` control values are drawn once at
/// construction and only ever read through piecewise-linear lookup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AmplitudeProfile {
    controls: Vec<f64>,
}

impl AmplitudeProfile {
    /// Draw `segments + 1` control values uniformly from
    /// `[1 - variation, 1 + variation]`.
    pub fn generate(
        segments: usize,
        variation: f64,
        rng: &mut impl Rng,
    ) -> NebulaResult<Self> {
        if segments == 0 {
            return Err(NebulaError::config("profile segments must be > 0"));
        }
        if !variation.is_finite() || variation < 0.0 {
            return Err(NebulaError::config(
                "profile variation must be finite and >= 0",
            ));
        }

        let controls = (0..=segments)
            .map(|_| 1.0 + (rng.random::<f64>() - 0.5) * 2.0 * variation)
            .collect();
        Ok(Self { controls })
    }

    /// All-ones profile (zero variation).
    pub fn flat(segments: usize) -> NebulaResult<Self> {
        if segments == 0 {
            return Err(NebulaError::config("profile segments must be > 0"));
        }
        Ok(Self {
            controls: vec![1.0; segments + 1],
        })
    }

    pub fn segments(&self) -> usize {
        self.controls.len() - 1
    }

    /// Control-value bounds; `value_at` never leaves this interval.
    pub fn bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &c in &self.controls {
            min = min.min(c);
            max = max.max(c);
        }
        (min, max)
    }

    /// Amplitude modifier at `x`, with x normalized against `width`.
    /// Positions outside `[0, width]` clamp to the boundary control
    /// values, so the lookup is total and continuous everywhere.
    pub fn value_at(&self, x: f64, width: f64) -> f64 {
        let segments = self.segments();
        let pos = (x / width * segments as f64).clamp(0.0, segments as f64);
        let idx = (pos.floor() as usize).min(segments);
        let next = (idx + 1).min(segments);
        let t = pos - idx as f64;
        self.controls[idx] * (1.0 - t) + self.controls[next] * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn profile() -> AmplitudeProfile {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        AmplitudeProfile::generate(5, 0.6, &mut rng).unwrap()
    }

    #[test]
    fn generate_has_segments_plus_one_controls() {
        let p = profile();
        assert_eq!(p.segments(), 5);
        let (min, max) = p.bounds();
        assert!(min >= 0.4 && max <= 1.6);
    }

    #[test]
    fn rejects_bad_construction() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        assert!(AmplitudeProfile::generate(0, 0.5, &mut rng).is_err());
        assert!(AmplitudeProfile::generate(5, -0.1, &mut rng).is_err());
        assert!(AmplitudeProfile::generate(5, f64::NAN, &mut rng).is_err());
        assert!(AmplitudeProfile::flat(0).is_err());
    }

    #[test]
    fn value_at_is_continuous_and_bounded() {
        let p = profile();
        let (min, max) = p.bounds();
        let width = 800.0;
        let eps = 1e-6;
        for i in 0..=4000 {
            let x = i as f64 / 4000.0 * width;
            let v = p.value_at(x, width);
            assert!(v >= min - 1e-12 && v <= max + 1e-12);
            let dv = (p.value_at(x + eps, width) - v).abs();
            assert!(dv < 1e-3, "jump of {dv} at x={x}");
        }
    }

    #[test]
    fn value_at_clamps_outside_width() {
        let p = profile();
        let width = 800.0;
        assert_eq!(p.value_at(-50.0, width), p.value_at(0.0, width));
        assert_eq!(p.value_at(900.0, width), p.value_at(width, width));
    }

    #[test]
    fn flat_profile_is_identity() {
        let p = AmplitudeProfile::flat(5).unwrap();
        for x in [0.0, 123.0, 400.0, 800.0] {
            assert_eq!(p.value_at(x, 800.0), 1.0);
        }
    }

    #[test]
    fn same_seed_same_controls() {
        let mut a = Pcg64Mcg::seed_from_u64(42);
        let mut b = Pcg64Mcg::seed_from_u64(42);
        assert_eq!(
            AmplitudeProfile::generate(5, 0.2, &mut a).unwrap(),
            AmplitudeProfile::generate(5, 0.2, &mut b).unwrap()
        );
    }
}
