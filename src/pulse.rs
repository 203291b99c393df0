use crate::error::{NebulaError, NebulaResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PulseState {
    Rising,
    Falling,
}

/// Bounded ping-pong oscillator for a scalar amplitude offset.
///
/// The offset ramps up to `+max`, flips to falling, ramps down to
/// `-max`, flips back, indefinitely. Overshoot is clipped exactly to the
/// bound, so no energy is gained or lost across a flip. Step size is
/// `dt * speed * scale`, keeping the pulsation rate frame-rate
/// independent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pulsation {
    offset: f64,
    max: f64,
    speed: f64,
    scale: f64,
    state: PulseState,
}

impl Pulsation {
    pub fn new(max: f64, speed: f64, scale: f64) -> NebulaResult<Self> {
        if !max.is_finite() || max <= 0.0 {
            return Err(NebulaError::config("pulsation max must be finite and > 0"));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(NebulaError::config("pulsation speed must be finite and > 0"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NebulaError::config("pulsation scale must be finite and > 0"));
        }
        Ok(Self {
            offset: 0.0,
            max,
            speed,
            scale,
            state: PulseState::Rising,
        })
    }

    /// Start from a non-zero offset (clamped into `[-max, max]`).
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset.clamp(-self.max, self.max);
        self
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn state(&self) -> PulseState {
        self.state
    }

    pub fn tick(&mut self, dt_secs: f64) -> f64 {
        let step = dt_secs * self.speed * self.scale;
        match self.state {
            PulseState::Rising => {
                self.offset += step;
                if self.offset >= self.max {
                    self.offset = self.max;
                    self.state = PulseState::Falling;
                }
            }
            PulseState::Falling => {
                self.offset -= step;
                if self.offset <= -self.max {
                    self.offset = -self.max;
                    self.state = PulseState::Rising;
                }
            }
        }
        self.offset
    }
}
