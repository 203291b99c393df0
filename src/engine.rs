use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    clock::PhaseClock,
    compositor::{DrawList, FrameSnapshot, LayerSet},
    core::Canvas,
    error::{NebulaError, NebulaResult},
    palette::{Palette, PaletteFade},
    profile::AmplitudeProfile,
    pulse::Pulsation,
    scene::SceneConfig,
    stars::StarField,
};

/// Owns all animation state for one scene and recomputes the full draw
/// list from it on every `tick`. Single writer: state advances exactly
/// once per tick, then every layer reads the same snapshot.
#[derive(Clone, Debug)]
pub struct Engine {
    canvas: Canvas,
    layers: LayerSet,
    stars: Option<StarField>,
    clock: PhaseClock,
    breath: PhaseClock,
    phase_rate: f64,
    breath_rate: f64,
    pulse: Option<Pulsation>,
    fade: Option<PaletteFade>,
    palettes: Vec<Palette>,
    fade_duration_secs: f64,
}

impl Engine {
    /// Deterministic construction from an explicit seed.
    pub fn new(config: SceneConfig, seed: u64) -> NebulaResult<Self> {
        Self::with_rng(config, &mut Pcg64Mcg::seed_from_u64(seed))
    }

    /// Fresh randomness per instantiation, like the session-seeded
    /// original. Prefer [`Engine::new`] in tests.
    pub fn from_entropy(config: SceneConfig) -> NebulaResult<Self> {
        Self::with_rng(config, &mut Pcg64Mcg::from_rng(&mut rand::rng()))
    }

    pub fn with_rng(config: SceneConfig, rng: &mut impl Rng) -> NebulaResult<Self> {
        config.validate()?;

        let shared = Arc::new(AmplitudeProfile::generate(
            config.profile.segments,
            config.profile.variation,
            rng,
        )?);
        let layers = LayerSet::build(config.layers, &shared, rng)?;
        let stars = config
            .stars
            .map(|s| StarField::generate(s.count, config.canvas, s.z, rng));
        let pulse = config
            .pulse
            .map(|p| Pulsation::new(p.max, p.speed, p.scale))
            .transpose()?;
        let fade = config
            .palettes
            .first()
            .map(|initial| PaletteFade::new(initial.clone()));

        Ok(Self {
            canvas: config.canvas,
            layers,
            stars,
            clock: PhaseClock::new(),
            breath: PhaseClock::new(),
            phase_rate: config.phase_rate,
            breath_rate: config.breath_rate,
            pulse,
            fade,
            palettes: config.palettes,
            fade_duration_secs: config.fade_duration_secs,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn phase(&self) -> f64 {
        self.clock.phase()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.as_ref().is_some_and(PaletteFade::is_fading)
    }

    /// Start fading the engine's fade palette toward the indexed entry
    /// of the scene's palette table.
    pub fn trigger_palette(&mut self, index: usize) -> NebulaResult<()> {
        let target = self.palettes.get(index).cloned().ok_or_else(|| {
            NebulaError::config(format!(
                "palette index {index} out of range ({} palettes)",
                self.palettes.len()
            ))
        })?;
        let fade = self
            .fade
            .as_mut()
            .ok_or_else(|| NebulaError::config("scene has no palette table"))?;
        fade.begin(target, self.fade_duration_secs)
    }

    /// Advance all animation state by `dt_secs` and recompute the frame.
    /// A zero delta recomputes the identical draw list.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tick(&mut self, dt_secs: f64) -> NebulaResult<DrawList> {
        if !dt_secs.is_finite() || dt_secs < 0.0 {
            return Err(NebulaError::animation(
                "tick delta must be finite and >= 0",
            ));
        }

        let phase = self.clock.advance(dt_secs, self.phase_rate);
        let breath_phase = self.breath.advance(dt_secs, self.breath_rate);
        let pulse_offset = match self.pulse.as_mut() {
            Some(p) => p.tick(dt_secs),
            None => 0.0,
        };
        if let Some(fade) = self.fade.as_mut() {
            fade.tick(dt_secs);
        }

        let snap = FrameSnapshot {
            phase,
            breath_phase,
            pulse_offset,
            fade_palette: self.fade.as_ref().map(PaletteFade::current),
        };

        let mut shapes = self.layers.compute_frame(&snap)?;
        if let Some(stars) = &self.stars {
            shapes.extend(stars.shapes(phase));
        }
        tracing::trace!(shapes = shapes.len(), phase, "frame computed");
        Ok(DrawList::from_shapes(shapes))
    }
}
