use crate::{
    contour::EdgeClose,
    core::Placement,
    error::{NebulaError, NebulaResult},
    palette::{Palette, Rgba},
    wave::WaveParams,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    Normal,
    /// Additive-looking blend used by the glow layers.
    Screen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GradientAxis {
    BottomToTop,
    TopToBottom,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Fill {
    Solid(Rgba),
    LinearGradient { palette: Palette, axis: GradientAxis },
    /// Gradient driven by the engine's palette-fade machine; the current
    /// interpolated palette is substituted at frame computation.
    FadePalette { axis: GradientAxis },
}

/// Where a layer's amplitude profile comes from.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ProfileSource {
    /// The scene-wide profile; layers sharing it move in lockstep.
    Shared,
    /// A profile of the layer's own, decorrelated from the rest.
    Own { segments: usize, variation: f64 },
}

/// Full configuration of one wave layer. Immutable once built into a
/// layer set, except that a `FadePalette` fill tracks the fade machine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerConfig {
    pub name: String,
    pub width: f64,
    pub placement: Placement,
    pub wavelength: f64,
    pub base_amplitude: f64,
    pub oscillation_amplitude: f64,
    pub amplitude_scale: f64,
    pub phase_rate_multiplier: f64,
    pub phase_offset: f64,
    pub centerline: f64,
    pub close: EdgeClose,
    pub resolution: usize,
    pub profile: ProfileSource,
    pub fill: Fill,
    pub opacity: f64,
    pub blend: BlendMode,
    pub blur: Option<f64>,
    /// How strongly the pulsation offset feeds this layer's base
    /// amplitude (0 disables).
    pub pulse_weight: f64,
    /// Vertical centerline travel driven by the breath clock (0 disables).
    pub breath_centerline_amplitude: f64,
    /// Gradient stop whose offset breathes as `0.5 + 0.4·sin(breath)`.
    pub breath_stop: Option<usize>,
    pub z: i32,
}

impl LayerConfig {
    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            width: self.width,
            wavelength: self.wavelength,
            base_amplitude: self.base_amplitude,
            oscillation_amplitude: self.oscillation_amplitude,
            phase_rate_multiplier: self.phase_rate_multiplier,
            phase_offset: self.phase_offset,
            amplitude_scale: self.amplitude_scale,
            centerline: self.centerline,
        }
    }

    pub fn validate(&self) -> NebulaResult<()> {
        if self.name.trim().is_empty() {
            return Err(NebulaError::config("layer name must be non-empty"));
        }
        self.wave_params()
            .validate()
            .map_err(|e| NebulaError::config(format!("layer '{}': {e}", self.name)))?;

        if self.resolution == 0 {
            return Err(NebulaError::config(format!(
                "layer '{}': resolution must be > 0",
                self.name
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(NebulaError::config(format!(
                "layer '{}': opacity must be in [0, 1]",
                self.name
            )));
        }
        if let Some(blur) = self.blur
            && (!blur.is_finite() || blur < 0.0)
        {
            return Err(NebulaError::config(format!(
                "layer '{}': blur must be finite and >= 0",
                self.name
            )));
        }
        if !self.pulse_weight.is_finite() || !self.breath_centerline_amplitude.is_finite() {
            return Err(NebulaError::config(format!(
                "layer '{}': pulse/breath parameters must be finite",
                self.name
            )));
        }
        if let EdgeClose::Ribbon { thickness } = self.close
            && !thickness.is_finite()
        {
            return Err(NebulaError::config(format!(
                "layer '{}': ribbon thickness must be finite",
                self.name
            )));
        }
        if let ProfileSource::Own { segments, variation } = self.profile {
            if segments == 0 {
                return Err(NebulaError::config(format!(
                    "layer '{}': profile segments must be > 0",
                    self.name
                )));
            }
            if !variation.is_finite() || variation < 0.0 {
                return Err(NebulaError::config(format!(
                    "layer '{}': profile variation must be finite and >= 0",
                    self.name
                )));
            }
        }
        if let Some(idx) = self.breath_stop {
            let stops = match &self.fill {
                Fill::LinearGradient { palette, .. } => Some(palette.len()),
                // Checked against the palette table by the scene.
                Fill::FadePalette { .. } => None,
                Fill::Solid(_) => Some(0),
            };
            if let Some(len) = stops
                && idx >= len
            {
                return Err(NebulaError::config(format!(
                    "layer '{}': breath_stop {idx} out of range",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_layer() -> LayerConfig {
    LayerConfig {
        name: "glow".to_string(),
        width: 800.0,
        placement: Placement::default(),
        wavelength: 200.0,
        base_amplitude: 10.0,
        oscillation_amplitude: 10.0,
        amplitude_scale: 1.0,
        phase_rate_multiplier: 1.0,
        phase_offset: 0.0,
        centerline: 300.0,
        close: EdgeClose::GlowTop,
        resolution: 800,
        profile: ProfileSource::Shared,
        fill: Fill::Solid(Rgba::BLACK),
        opacity: 0.7,
        blend: BlendMode::Screen,
        blur: None,
        pulse_weight: 0.0,
        breath_centerline_amplitude: 0.0,
        breath_stop: None,
        z: 0,
    }
}
