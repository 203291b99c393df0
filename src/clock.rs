use std::f64::consts::TAU;

/// A scalar angle advanced once per tick and wrapped to `[0, 2π)`.
///
/// `advance` is the frame-delta-aware default: rates are expressed in
/// radians per second so motion speed does not depend on the display
/// refresh rate. `step` is the fixed-increment simplification (constant
/// angle per tick regardless of wall time) and should only be used where
/// frame-rate-proportional drift is acceptable.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseClock {
    phase: f64,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    pub fn with_phase(phase: f64) -> Self {
        Self {
            phase: phase.rem_euclid(TAU),
        }
    }

    pub fn phase(self) -> f64 {
        self.phase
    }

    /// Advance by `dt_secs * rate_rad_per_sec`. `advance(0, r)` is a no-op.
    pub fn advance(&mut self, dt_secs: f64, rate_rad_per_sec: f64) -> f64 {
        self.phase = (self.phase + dt_secs * rate_rad_per_sec).rem_euclid(TAU);
        self.phase
    }

    /// Fixed per-tick increment, ignoring wall time.
    pub fn step(&mut self, increment_rad: f64) -> f64 {
        self.phase = (self.phase + increment_rad).rem_euclid(TAU);
        self.phase
    }
}
