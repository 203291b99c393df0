use crate::error::{NebulaError, NebulaResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> NebulaResult<Self> {
        if width == 0 || height == 0 {
            return Err(NebulaError::config("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f(self) -> f64 {
        f64::from(self.height)
    }

    pub fn center(self) -> Point {
        Point::new(self.width_f() / 2.0, self.height_f() / 2.0)
    }
}

/// Visual placement of a layer: geometry stays in layer-local coordinates,
/// the render host applies this transform.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub translate: Vec2,
    pub rotation_deg: f64,
    pub pivot: Point, // rotation center in canvas space
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_deg: 0.0,
            pivot: Point::ZERO,
        }
    }
}

impl Placement {
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_pivot = Affine::translate(self.pivot.to_vec2());
        let t_unpivot = Affine::translate(-self.pivot.to_vec2());
        let t_rotate = Affine::rotate(self.rotation_deg.to_radians());

        // Rotation is applied about the pivot, then the translation:
        // T(translate) * T(pivot) * R(rot) * T(-pivot)
        t_translate * t_pivot * t_rotate * t_unpivot
    }
}
