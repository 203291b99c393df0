use crate::{
    core::{BezPath, Point},
    profile::AmplitudeProfile,
    wave::{WaveParams, sample_y},
};

/// How a wave edge is closed into a fillable outline. One policy per
/// layer kind; the builder never branches per call site.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EdgeClose {
    /// Re-trace the edge right-to-left shifted down by `thickness`,
    /// producing a ribbon of `2 * (resolution + 1)` points. The caller
    /// picks a thickness that keeps the edges from crossing; the builder
    /// does not validate it.
    Ribbon { thickness: f64 },
    /// Close through the top-right and top-left corners of the drawing
    /// surface (`resolution + 3` points), filling from the wave upward.
    GlowTop,
}

/// Ordered, closed point sequence describing a fillable outline. The
/// last point implicitly connects back to the first. Regenerated in full
/// every tick; never mutated across ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }
}

/// Sample `resolution + 1` evenly spaced x positions from 0 to
/// `params.width` left-to-right, then close per `close`.
pub fn build_contour(
    resolution: usize,
    profile: &AmplitudeProfile,
    phase: f64,
    params: &WaveParams,
    close: EdgeClose,
) -> Contour {
    let capacity = match close {
        EdgeClose::Ribbon { .. } => 2 * (resolution + 1),
        EdgeClose::GlowTop => resolution + 3,
    };
    let mut points = Vec::with_capacity(capacity);

    for i in 0..=resolution {
        let x = i as f64 / resolution as f64 * params.width;
        points.push(Point::new(x, sample_y(x, profile, phase, params)));
    }

    match close {
        EdgeClose::Ribbon { thickness } => {
            for i in (0..=resolution).rev() {
                let x = i as f64 / resolution as f64 * params.width;
                points.push(Point::new(
                    x,
                    sample_y(x, profile, phase, params) + thickness,
                ));
            }
        }
        EdgeClose::GlowTop => {
            points.push(Point::new(params.width, 0.0));
            points.push(Point::new(0.0, 0.0));
        }
    }

    Contour { points }
}
