use std::sync::Arc;

use rand::Rng;

use crate::{
    contour::build_contour,
    core::{Affine, BezPath, Point},
    error::{NebulaError, NebulaResult},
    layer::{BlendMode, Fill, GradientAxis, LayerConfig, ProfileSource},
    palette::{Palette, Rgba},
    profile::AmplitudeProfile,
};

/// Per-tick state read by every layer. Taken once before any layer is
/// computed, so a frame never observes another layer mid-update.
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot<'a> {
    pub phase: f64,
    pub breath_phase: f64,
    pub pulse_offset: f64,
    pub fade_palette: Option<&'a Palette>,
}

/// Fill as it appears in the draw list — fade indirection resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintFill {
    Solid(Rgba),
    LinearGradient { palette: Palette, axis: GradientAxis },
}

#[derive(Clone, Debug)]
pub enum ShapeGeometry {
    Path(BezPath),
    Circle { center: Point, radius: f64 },
}

/// One paintable shape. Geometry is in layer-local coordinates; the
/// render host applies `transform` (translate + rotate about a pivot).
#[derive(Clone, Debug)]
pub struct Shape {
    pub geometry: ShapeGeometry,
    pub fill: PaintFill,
    pub opacity: f64,
    pub blend: BlendMode,
    pub blur: Option<f64>,
    pub transform: Affine,
    pub z: i32,
}

/// Back-to-front draw list for one frame: full replace, not a patch.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    /// Sorts back-to-front by z; ties keep insertion order.
    pub fn from_shapes(mut shapes: Vec<Shape>) -> Self {
        shapes.sort_by_key(|s| s.z);
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// A layer bound to its amplitude profile.
#[derive(Clone, Debug)]
pub struct BuiltLayer {
    config: LayerConfig,
    profile: Arc<AmplitudeProfile>,
}

impl BuiltLayer {
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn profile(&self) -> &AmplitudeProfile {
        &self.profile
    }
}

#[derive(Clone, Debug)]
pub struct LayerSet {
    layers: Vec<BuiltLayer>,
}

impl LayerSet {
    /// Validate every config and bind each layer to a profile: the
    /// shared scene profile, or a freshly drawn one for `Own` sources.
    pub fn build(
        configs: Vec<LayerConfig>,
        shared: &Arc<AmplitudeProfile>,
        rng: &mut impl Rng,
    ) -> NebulaResult<Self> {
        let mut layers = Vec::with_capacity(configs.len());
        for config in configs {
            config.validate()?;
            let profile = match config.profile {
                ProfileSource::Shared => Arc::clone(shared),
                ProfileSource::Own {
                    segments,
                    variation,
                } => Arc::new(AmplitudeProfile::generate(segments, variation, rng)?),
            };
            layers.push(BuiltLayer { config, profile });
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[BuiltLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Recompute every layer's contour against one snapshot. Geometry is
    /// rebuilt from scratch; nothing persists between frames.
    #[tracing::instrument(level = "trace", skip_all, fields(layers = self.layers.len()))]
    pub fn compute_frame(&self, snap: &FrameSnapshot<'_>) -> NebulaResult<Vec<Shape>> {
        let mut shapes = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let config = &layer.config;

            let mut params = config.wave_params();
            params.base_amplitude += snap.pulse_offset * config.pulse_weight;
            if config.breath_centerline_amplitude != 0.0 {
                params.centerline +=
                    snap.breath_phase.sin() * config.breath_centerline_amplitude;
            }

            let contour =
                build_contour(config.resolution, &layer.profile, snap.phase, &params, config.close);

            let fill = resolve_fill(config, snap)?;

            shapes.push(Shape {
                geometry: ShapeGeometry::Path(contour.to_bez_path()),
                fill,
                opacity: config.opacity.clamp(0.0, 1.0),
                blend: config.blend,
                blur: config.blur,
                transform: config.placement.to_affine(),
                z: config.z,
            });
        }
        Ok(shapes)
    }
}

fn resolve_fill(config: &LayerConfig, snap: &FrameSnapshot<'_>) -> NebulaResult<PaintFill> {
    let breathe = |mut palette: Palette| {
        if let Some(idx) = config.breath_stop {
            palette.set_stop_offset(idx, 0.5 + 0.4 * snap.breath_phase.sin());
        }
        palette
    };

    match &config.fill {
        Fill::Solid(color) => Ok(PaintFill::Solid(*color)),
        Fill::LinearGradient { palette, axis } => Ok(PaintFill::LinearGradient {
            palette: breathe(palette.clone()),
            axis: *axis,
        }),
        Fill::FadePalette { axis } => {
            let palette = snap.fade_palette.ok_or_else(|| {
                NebulaError::config(format!(
                    "layer '{}' uses the fade palette but no palette table is configured",
                    config.name
                ))
            })?;
            Ok(PaintFill::LinearGradient {
                palette: breathe(palette.clone()),
                axis: *axis,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::EdgeClose;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn layer(name: &str, z: i32) -> LayerConfig {
        LayerConfig {
            z,
            name: name.to_string(),
            ..crate::layer::test_layer()
        }
    }

    fn set(configs: Vec<LayerConfig>) -> LayerSet {
        let shared = Arc::new(AmplitudeProfile::flat(5).unwrap());
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        LayerSet::build(configs, &shared, &mut rng).unwrap()
    }

    fn snap(pulse: f64) -> FrameSnapshot<'static> {
        FrameSnapshot {
            phase: 0.4,
            breath_phase: 0.0,
            pulse_offset: pulse,
            fade_palette: None,
        }
    }

    #[test]
    fn draw_list_orders_back_to_front() {
        let layers = set(vec![layer("top", 5), layer("back", -1), layer("mid", 2)]);
        let list = DrawList::from_shapes(layers.compute_frame(&snap(0.0)).unwrap());
        let zs: Vec<i32> = list.shapes().iter().map(|s| s.z).collect();
        assert_eq!(zs, vec![-1, 2, 5]);
    }

    #[test]
    fn build_rejects_invalid_config() {
        let shared = Arc::new(AmplitudeProfile::flat(5).unwrap());
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut bad = layer("bad", 0);
        bad.wavelength = 0.0;
        assert!(LayerSet::build(vec![bad], &shared, &mut rng).is_err());
    }

    #[test]
    fn same_snapshot_yields_identical_geometry() {
        let layers = set(vec![layer("a", 0)]);
        let s = snap(3.0);
        let first = layers.compute_frame(&s).unwrap();
        let second = layers.compute_frame(&s).unwrap();
        let (ShapeGeometry::Path(p1), ShapeGeometry::Path(p2)) =
            (&first[0].geometry, &second[0].geometry)
        else {
            panic!("expected paths");
        };
        assert_eq!(p1.to_svg(), p2.to_svg());
    }

    #[test]
    fn pulse_offset_changes_amplitude() {
        let mut config = layer("a", 0);
        config.pulse_weight = 1.0;
        config.oscillation_amplitude = 0.0;
        config.close = EdgeClose::GlowTop;
        let layers = set(vec![config]);

        let still = layers.compute_frame(&snap(0.0)).unwrap();
        let pulsed = layers.compute_frame(&snap(5.0)).unwrap();
        let (ShapeGeometry::Path(a), ShapeGeometry::Path(b)) =
            (&still[0].geometry, &pulsed[0].geometry)
        else {
            panic!("expected paths");
        };
        assert_ne!(a.to_svg(), b.to_svg());
    }

    #[test]
    fn fade_fill_requires_palette() {
        let mut config = layer("a", 0);
        config.fill = Fill::FadePalette {
            axis: GradientAxis::BottomToTop,
        };
        let layers = set(vec![config]);
        assert!(layers.compute_frame(&snap(0.0)).is_err());

        let palette = Palette::parse(&[(0.0, "#7F00FF"), (1.0, "#000000")]).unwrap();
        let s = FrameSnapshot {
            fade_palette: Some(&palette),
            ..snap(0.0)
        };
        let shapes = layers.compute_frame(&s).unwrap();
        assert!(matches!(shapes[0].fill, PaintFill::LinearGradient { .. }));
    }

    #[test]
    fn own_profile_decorrelates_layers() {
        let shared = Arc::new(AmplitudeProfile::flat(5).unwrap());
        let mut rng = Pcg64Mcg::seed_from_u64(9);
        let mut own = layer("own", 0);
        own.profile = ProfileSource::Own {
            segments: 5,
            variation: 0.6,
        };
        let set = LayerSet::build(vec![layer("shared", 0), own], &shared, &mut rng).unwrap();
        assert_eq!(set.layers()[0].profile().value_at(100.0, 800.0), 1.0);
        assert_ne!(
            set.layers()[1].profile(),
            set.layers()[0].profile()
        );
    }
}
