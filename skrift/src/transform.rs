//! Affine transforms and clipping of outline points.

use raw::types::Point;

/// A 2x3 affine transform.
///
/// Maps a point `(x, y)` to `(xx * x + xy * y + dx, yx * x + yy * y + dy)`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub xx: f32,
    pub yx: f32,
    pub xy: f32,
    pub yy: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Transform {
    /// The transform that leaves points where they are.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a transform from a 2x2 matrix and a translation.
    ///
    /// The arguments are in column order, matching composite glyph
    /// transforms.
    pub const fn new(xx: f32, yx: f32, xy: f32, yy: f32, dx: f32, dy: f32) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            dx,
            dy,
        }
    }

    /// Creates a transform that scales and then translates.
    pub const fn scale_translate(x_scale: f32, y_scale: f32, dx: f32, dy: f32) -> Self {
        Self::new(x_scale, 0.0, 0.0, y_scale, dx, dy)
    }

    /// Applies the transform to a single point.
    #[inline]
    pub fn transform_point(&self, point: Point<f32>) -> Point<f32> {
        Point::new(
            self.xx * point.x + self.xy * point.y + self.dx,
            self.yx * point.x + self.yy * point.y + self.dy,
        )
    }

    /// Transforms every point in place.
    pub fn transform_points(&self, points: &mut [Point<f32>]) {
        for point in points {
            *point = self.transform_point(*point);
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Clamps points into the half open rectangle `[0, width) x [0, height)`.
///
/// NaN coordinates are left alone.
pub(crate) fn clip_points(points: &mut [Point<f32>], width: f32, height: f32) {
    let max_x = prev_float(width);
    let max_y = prev_float(height);
    for point in points {
        point.x = clamp(point.x, max_x);
        point.y = clamp(point.y, max_y);
    }
}

fn clamp(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        0.0
    } else if value > max {
        max
    } else {
        value
    }
}

/// Largest float below a positive finite `value`, or zero.
fn prev_float(value: f32) -> f32 {
    if value > 0.0 && value.is_finite() {
        f32::from_bits(value.to_bits() - 1)
    } else {
        0.0
    }
}
