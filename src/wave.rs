use std::f64::consts::TAU;

use crate::{
    error::{NebulaError, NebulaResult},
    profile::AmplitudeProfile,
};

/// Inputs to the wave sampler for one edge of one layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WaveParams {
    pub width: f64,
    pub wavelength: f64,
    pub base_amplitude: f64,
    /// Amplitude of the fast temporal oscillation superimposed on the
    /// slow per-segment modifier. Both terms together produce the
    /// organic, non-repeating look; zeroing this flattens the motion.
    pub oscillation_amplitude: f64,
    pub phase_rate_multiplier: f64,
    pub phase_offset: f64,
    /// Uniform scale on both amplitude terms (the mask wave runs at 0.5).
    pub amplitude_scale: f64,
    pub centerline: f64,
}

impl WaveParams {
    pub fn validate(&self) -> NebulaResult<()> {
        if !self.wavelength.is_finite() || self.wavelength <= 0.0 {
            return Err(NebulaError::config("wavelength must be finite and > 0"));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(NebulaError::config("wave width must be finite and > 0"));
        }
        for (name, v) in [
            ("base_amplitude", self.base_amplitude),
            ("oscillation_amplitude", self.oscillation_amplitude),
            ("phase_rate_multiplier", self.phase_rate_multiplier),
            ("phase_offset", self.phase_offset),
            ("amplitude_scale", self.amplitude_scale),
            ("centerline", self.centerline),
        ] {
            if !v.is_finite() {
                return Err(NebulaError::config(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

/// Pure y-coordinate of the wave edge at `x`.
///
/// Two-frequency composition: the profile supplies slow positional
/// variation, the oscillation term supplies fast temporal variation at
/// half the carrier frequency, and the carrier `sin(2πx/λ)` turns the
/// combined amplitude into the visible wave.
pub fn sample_y(x: f64, profile: &AmplitudeProfile, phase: f64, params: &WaveParams) -> f64 {
    let modifier = profile.value_at(x, params.width);
    let oscillation = (TAU * x / (params.wavelength * 2.0)
        + phase * params.phase_rate_multiplier
        + params.phase_offset)
        .sin()
        * params.oscillation_amplitude
        * params.amplitude_scale;

    let amplitude = params.base_amplitude * params.amplitude_scale * modifier + oscillation;
    params.centerline + amplitude * (TAU * x / params.wavelength).sin()
}
