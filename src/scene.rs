use std::f64::consts::PI;

use crate::{
    contour::EdgeClose,
    core::{Canvas, Placement, Point, Vec2},
    error::{NebulaError, NebulaResult},
    layer::{BlendMode, Fill, GradientAxis, LayerConfig, ProfileSource},
    palette::{ColorStop, Palette, Rgba},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProfileSettings {
    pub segments: usize,
    pub variation: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StarSettings {
    pub count: usize,
    pub z: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PulseSettings {
    pub max: f64,
    pub speed: f64,
    pub scale: f64,
}

/// Everything needed to instantiate an [`Engine`](crate::Engine):
/// canvas, the shared amplitude profile settings, the layer stack, the
/// optional star field, the palette table for fade triggers, and clock
/// rates in radians per second.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    pub canvas: Canvas,
    pub profile: ProfileSettings,
    pub layers: Vec<LayerConfig>,
    pub stars: Option<StarSettings>,
    pub palettes: Vec<Palette>,
    pub phase_rate: f64,
    pub breath_rate: f64,
    pub pulse: Option<PulseSettings>,
    pub fade_duration_secs: f64,
}

impl SceneConfig {
    pub fn validate(&self) -> NebulaResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(NebulaError::config("canvas width/height must be > 0"));
        }
        if self.profile.segments == 0 {
            return Err(NebulaError::config("profile segments must be > 0"));
        }
        if !self.profile.variation.is_finite() || self.profile.variation < 0.0 {
            return Err(NebulaError::config(
                "profile variation must be finite and >= 0",
            ));
        }
        if self.layers.is_empty() {
            return Err(NebulaError::config("scene must have at least one layer"));
        }
        if !self.phase_rate.is_finite() || !self.breath_rate.is_finite() {
            return Err(NebulaError::config("clock rates must be finite"));
        }
        if let Some(p) = self.pulse {
            if !p.max.is_finite() || p.max <= 0.0 {
                return Err(NebulaError::config("pulsation max must be finite and > 0"));
            }
            if !p.speed.is_finite() || p.speed <= 0.0 || !p.scale.is_finite() || p.scale <= 0.0 {
                return Err(NebulaError::config(
                    "pulsation speed/scale must be finite and > 0",
                ));
            }
        }

        let mut uses_fade = false;
        for layer in &self.layers {
            layer.validate()?;
            if let Fill::FadePalette { .. } = layer.fill {
                uses_fade = true;
                if let Some(idx) = layer.breath_stop {
                    for palette in &self.palettes {
                        if idx >= palette.len() {
                            return Err(NebulaError::config(format!(
                                "layer '{}': breath_stop {idx} out of range for palette table",
                                layer.name
                            )));
                        }
                    }
                }
            }
        }
        if uses_fade {
            if self.palettes.is_empty() {
                return Err(NebulaError::config(
                    "a layer uses the fade palette but the palette table is empty",
                ));
            }
            if !self.fade_duration_secs.is_finite() || self.fade_duration_secs <= 0.0 {
                return Err(NebulaError::config(
                    "fade duration must be finite and > 0",
                ));
            }
        }
        Ok(())
    }

    /// The classic three-glow arrangement: stacked translucent glows at
    /// staggered phase offsets, a blurred top mask, faint silhouette
    /// ribbons, a breathing veil and a glimmering star field.
    pub fn aurora(width: u32, height: u32) -> NebulaResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let w = canvas.width_f();
        let h = canvas.height_f();
        let center = canvas.center();
        let centerline = h / 2.0;

        let purple = glow_palette(
            Rgba::new(0x7F, 0x00, 0xFF, 1.0),
            Rgba::new(0x00, 0xFF, 0xFF, 0.3),
            Rgba::new(0x00, 0x00, 0x00, 0.0),
        )?;
        let cyan = glow_palette(
            Rgba::new(0x00, 0xFF, 0xFF, 1.0),
            Rgba::new(0x41, 0x69, 0xE1, 0.3),
            Rgba::new(0x00, 0x00, 0x00, 0.0),
        )?;
        let blue = glow_palette(
            Rgba::new(0x41, 0x69, 0xE1, 1.0),
            Rgba::new(0x83, 0x32, 0xD3, 0.3),
            Rgba::new(0x8F, 0x2E, 0x2E, 0.0),
        )?;

        let veil_palette = Palette::new(vec![
            ColorStop {
                offset: 0.0,
                color: Rgba::new(0x03, 0x6A, 0x7C, 1.0),
            },
            ColorStop {
                offset: 0.5,
                color: Rgba::new(0x00, 0x6B, 0x96, 0.5),
            },
            ColorStop {
                offset: 1.0,
                color: Rgba::new(0xFF, 0xFF, 0xFF, 0.3),
            },
        ])?;

        let glow = |name: &str, phase_offset: f64, fill: Fill, opacity: f64, z: i32| LayerConfig {
            name: name.to_string(),
            width: w,
            placement: centered_placement(w, w, center),
            wavelength: 200.0,
            base_amplitude: 10.0,
            oscillation_amplitude: 10.0,
            amplitude_scale: 1.0,
            phase_rate_multiplier: 1.0,
            phase_offset,
            centerline,
            close: EdgeClose::GlowTop,
            resolution: 800,
            profile: ProfileSource::Shared,
            fill,
            opacity,
            blend: BlendMode::Screen,
            blur: None,
            pulse_weight: 1.0,
            breath_centerline_amplitude: 0.0,
            breath_stop: None,
            z,
        };

        let silhouette = |name: &str, z: i32| LayerConfig {
            name: name.to_string(),
            fill: Fill::Solid(Rgba::BLACK),
            opacity: 0.1,
            blend: BlendMode::Normal,
            close: EdgeClose::Ribbon { thickness: 2.0 },
            pulse_weight: 0.0,
            z,
            ..glow("", 0.0, Fill::Solid(Rgba::BLACK), 0.1, z)
        };

        let layers = vec![
            LayerConfig {
                name: "veil".to_string(),
                centerline: h / 4.0,
                close: EdgeClose::GlowTop,
                fill: Fill::LinearGradient {
                    palette: veil_palette,
                    axis: GradientAxis::TopToBottom,
                },
                opacity: 0.35,
                blend: BlendMode::Normal,
                pulse_weight: 0.0,
                breath_centerline_amplitude: 50.0,
                breath_stop: Some(1),
                z: 5,
                ..glow("", 0.0, Fill::Solid(Rgba::BLACK), 0.35, 5)
            },
            glow(
                "glow-purple",
                0.0,
                Fill::FadePalette {
                    axis: GradientAxis::BottomToTop,
                },
                0.7,
                10,
            ),
            glow(
                "glow-cyan",
                PI / 3.0,
                Fill::LinearGradient {
                    palette: cyan.clone(),
                    axis: GradientAxis::BottomToTop,
                },
                0.2,
                11,
            ),
            glow(
                "glow-blue",
                2.0 * PI / 3.0,
                Fill::LinearGradient {
                    palette: blue.clone(),
                    axis: GradientAxis::BottomToTop,
                },
                0.5,
                12,
            ),
            LayerConfig {
                name: "top-mask".to_string(),
                wavelength: 150.0,
                amplitude_scale: 0.5,
                phase_rate_multiplier: 3.0,
                centerline: 0.0,
                close: EdgeClose::Ribbon { thickness: 300.0 },
                fill: Fill::Solid(Rgba::BLACK),
                opacity: 0.25,
                blend: BlendMode::Normal,
                blur: Some(15.0),
                pulse_weight: 0.0,
                z: 13,
                ..glow("", 0.0, Fill::Solid(Rgba::BLACK), 0.25, 13)
            },
            silhouette("silhouette-main", 14),
            silhouette("silhouette-second", 15),
            silhouette("silhouette-third", 16),
        ];

        Ok(Self {
            canvas,
            profile: ProfileSettings {
                segments: 5,
                variation: 0.2,
            },
            layers,
            stars: Some(StarSettings { count: 20, z: 1 }),
            palettes: vec![purple, cyan, blue],
            // 0.025 rad per frame at 60 fps and a fifth of that for the
            // breathing clock.
            phase_rate: 1.5,
            breath_rate: 0.3,
            pulse: Some(PulseSettings {
                max: 4.0,
                speed: 1.5,
                scale: 1.0,
            }),
            fade_duration_secs: 2.0,
        })
    }
}

fn centered_placement(canvas_width: f64, layer_width: f64, pivot: Point) -> Placement {
    Placement {
        translate: Vec2::new((canvas_width - layer_width) / 2.0, 0.0),
        rotation_deg: 0.0,
        pivot,
    }
}

fn glow_palette(bottom: Rgba, mid: Rgba, top: Rgba) -> NebulaResult<Palette> {
    Palette::new(vec![
        ColorStop {
            offset: 0.0,
            color: bottom,
        },
        ColorStop {
            offset: 0.4,
            color: mid,
        },
        ColorStop {
            offset: 0.8,
            color: top,
        },
    ])
}
