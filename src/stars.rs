use std::f64::consts::TAU;

use rand::Rng;

use crate::{
    compositor::{PaintFill, Shape, ShapeGeometry},
    core::{Affine, Canvas, Point},
    layer::BlendMode,
    palette::Rgba,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Glimmer {
    pub seed: f64,
    pub speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Star {
    pub center: Point,
    pub radius: f64,
    pub base_opacity: f64,
    pub glimmer: Option<Glimmer>,
}

/// Scattered background stars; a minority glimmer against the phase
/// clock, each at its own speed.
#[derive(Clone, Debug, PartialEq)]
pub struct StarField {
    stars: Vec<Star>,
    z: i32,
}

impl StarField {
    pub fn generate(count: usize, canvas: Canvas, z: i32, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| {
                let center = Point::new(
                    rng.random::<f64>() * canvas.width_f(),
                    rng.random::<f64>() * canvas.height_f(),
                );
                let radius = rng.random::<f64>() * 1.2 + 0.3;
                let base_opacity = rng.random::<f64>() * 0.7 + 0.3;
                let glimmering = rng.random::<f64>() < 0.15;
                let seed = rng.random::<f64>() * TAU;
                let speed = rng.random::<f64>() * 6.0 + 4.0;
                Star {
                    center,
                    radius,
                    base_opacity,
                    glimmer: glimmering.then_some(Glimmer { seed, speed }),
                }
            })
            .collect();
        Self { stars, z }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shapes(&self, phase: f64) -> Vec<Shape> {
        self.stars
            .iter()
            .map(|star| {
                let opacity = match star.glimmer {
                    Some(g) => {
                        let factor = (phase * g.speed + g.seed).sin() * 0.25 + 0.75;
                        (star.base_opacity * factor * 1.2).min(1.0)
                    }
                    None => star.base_opacity,
                };
                Shape {
                    geometry: ShapeGeometry::Circle {
                        center: star.center,
                        radius: star.radius,
                    },
                    fill: PaintFill::Solid(Rgba::WHITE),
                    opacity,
                    blend: BlendMode::Normal,
                    blur: None,
                    transform: Affine::IDENTITY,
                    z: self.z,
                }
            })
            .collect()
    }
}
