#![forbid(unsafe_code)]

//! Procedural layered wave-contour engine.
//!
//! A scene is a stack of independently parameterized wave layers. Each
//! layer samples a two-frequency wave (a slow, randomly drawn amplitude
//! profile times a fast phase-driven oscillation), closes the sampled
//! edge into a fillable contour, and the compositor emits the whole
//! stack as a back-to-front draw list of `kurbo` paths with gradient
//! fills. A single [`Engine::tick`] advances every clock and state
//! machine once and recomputes the frame from scratch; the render host
//! (see [`render_svg`] for the reference one) just paints what it gets.

pub mod clock;
pub mod compositor;
pub mod contour;
pub mod core;
pub mod engine;
pub mod error;
pub mod layer;
pub mod palette;
pub mod profile;
pub mod pulse;
pub mod scene;
pub mod scheduler;
pub mod stars;
pub mod svg;
pub mod wave;

pub use clock::PhaseClock;
pub use compositor::{DrawList, FrameSnapshot, LayerSet, PaintFill, Shape, ShapeGeometry};
pub use contour::{Contour, EdgeClose, build_contour};
pub use core::{Affine, BezPath, Canvas, Placement, Point, Vec2};
pub use engine::Engine;
pub use error::{NebulaError, NebulaResult};
pub use layer::{BlendMode, Fill, GradientAxis, LayerConfig, ProfileSource};
pub use palette::{ColorStop, Palette, PaletteFade, Rgba};
pub use profile::AmplitudeProfile;
pub use pulse::{PulseState, Pulsation};
pub use scene::{ProfileSettings, PulseSettings, SceneConfig, StarSettings};
pub use scheduler::{AnimationLoop, FrameScheduler, ManualScheduler};
pub use stars::StarField;
pub use svg::render_svg;
pub use wave::{WaveParams, sample_y};
