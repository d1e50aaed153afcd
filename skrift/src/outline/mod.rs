//! Decoded glyph outlines.
//!
//! An [`Outline`] is an arena of points plus an ordered list of
//! [`Segment`]s that refer to those points by index. Glyphs are decoded from
//! the `glyf` table in font units; the rasterization pipeline then
//! transforms the points into device space, clips them to the image,
//! flattens every curve into lines and hands the lines to the rasterizer.

mod error;
mod glyf;

use raw::types::{Pen, Point};

use crate::{image::Image, raster::Raster, transform::Transform};

pub use error::DrawError;
pub(crate) use glyf::decode_glyph;

/// Maximum number of nested composite glyph levels.
pub const GLYF_COMPOSITE_RECURSION_LIMIT: usize = 4;

/// Curves left after this many subdivisions are emitted as lines.
const MAX_TESSELLATION_DEPTH: u32 = 16;

/// Twice the area of the triangle formed by a curve's points at which the
/// curve is considered flat, in device units.
const FLATNESS_THRESHOLD: f32 = 2.0;

/// A line or quadratic curve between points of an [`Outline`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Segment {
    Line {
        begin: usize,
        end: usize,
    },
    Curve {
        begin: usize,
        end: usize,
        control: usize,
    },
}

impl Segment {
    /// Index of the first point of the segment.
    pub fn begin(&self) -> usize {
        match self {
            Self::Line { begin, .. } | Self::Curve { begin, .. } => *begin,
        }
    }

    /// Index of the last point of the segment.
    pub fn end(&self) -> usize {
        match self {
            Self::Line { end, .. } | Self::Curve { end, .. } => *end,
        }
    }
}

/// Points and segments of a glyph.
///
/// Segments of a contour are stored in order and share their end points,
/// so a contour starts wherever a segment does not begin at the end of the
/// previous one.
#[derive(Clone, Default, Debug)]
pub struct Outline {
    points: Vec<Point<f32>>,
    segments: Vec<Segment>,
}

impl Outline {
    /// Creates a new empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every point appended so far, referenced by index from the segments.
    pub fn points(&self) -> &[Point<f32>] {
        &self.points
    }

    /// Lines and quadratic curves in drawing order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the outline has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Removes all points and segments, keeping the allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point<f32>] {
        &mut self.points
    }

    pub(crate) fn push_point(&mut self, point: Point<f32>) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    pub(crate) fn push_line(&mut self, begin: usize, end: usize) {
        debug_assert!(begin < self.points.len() && end < self.points.len());
        self.segments.push(Segment::Line { begin, end });
    }

    pub(crate) fn push_curve(&mut self, begin: usize, end: usize, control: usize) {
        debug_assert!(
            begin < self.points.len() && end < self.points.len() && control < self.points.len()
        );
        self.segments.push(Segment::Curve {
            begin,
            end,
            control,
        });
    }

    pub(crate) fn extend_points(&mut self, points: impl IntoIterator<Item = Point<f32>>) {
        self.points.extend(points);
    }

    /// Applies the transform to every point.
    pub fn transform(&mut self, transform: &Transform) {
        transform.transform_points(&mut self.points);
    }

    /// Replaces every curve with lines that approximate it.
    ///
    /// A curve is split at its midpoint until the triangle formed by its
    /// begin, control and end points is small enough, so this should be
    /// called once the points are in device space.
    pub fn tessellate(&mut self) {
        if !self
            .segments
            .iter()
            .any(|segment| matches!(segment, Segment::Curve { .. }))
        {
            return;
        }
        let segments = std::mem::take(&mut self.segments);
        self.segments.reserve(segments.len());
        for segment in segments {
            match segment {
                Segment::Line { .. } => self.segments.push(segment),
                Segment::Curve {
                    begin,
                    end,
                    control,
                } => self.tessellate_curve(begin, end, control, 0),
            }
        }
    }

    fn tessellate_curve(&mut self, begin: usize, end: usize, control: usize, depth: u32) {
        let (b, c, e) = (self.points[begin], self.points[control], self.points[end]);
        if is_flat(b, c, e) {
            self.push_line(begin, end);
            return;
        }
        if depth >= MAX_TESSELLATION_DEPTH {
            log::debug!("curve subdivision stopped at depth {depth}");
            self.push_line(begin, end);
            return;
        }
        let control0 = self.push_point(b.midpoint(c));
        let control1 = self.push_point(c.midpoint(e));
        let pivot = self.push_point(self.points[control0].midpoint(self.points[control1]));
        self.tessellate_curve(begin, pivot, control0, depth + 1);
        self.tessellate_curve(pivot, end, control1, depth + 1);
    }

    /// Emits the outline as a sequence of path commands.
    pub fn draw(&self, pen: &mut impl Pen) {
        let mut last_end = None;
        for segment in &self.segments {
            if last_end != Some(segment.begin()) {
                if last_end.is_some() {
                    pen.close();
                }
                let start = self.points[segment.begin()];
                pen.move_to(start.x, start.y);
            }
            match *segment {
                Segment::Line { end, .. } => {
                    let p = self.points[end];
                    pen.line_to(p.x, p.y);
                }
                Segment::Curve { end, control, .. } => {
                    let (c, p) = (self.points[control], self.points[end]);
                    pen.quad_to(c.x, c.y, p.x, p.y);
                }
            }
            last_end = Some(segment.end());
        }
        if last_end.is_some() {
            pen.close();
        }
    }

    /// Runs the rasterization pipeline, writing coverage into `image`.
    ///
    /// The outline is consumed in the process: its points end up in device
    /// space and its curves are replaced by lines.
    pub(crate) fn render(&mut self, transform: &Transform, image: &mut Image) {
        self.transform(transform);
        crate::transform::clip_points(&mut self.points, image.width as f32, image.height as f32);
        self.tessellate();
        let mut raster = Raster::new(image.width as usize, image.height as usize);
        for segment in &self.segments {
            raster.draw_line(self.points[segment.begin()], self.points[segment.end()]);
        }
        raster.accumulate(&mut image.pixels);
    }
}

fn is_flat(begin: Point<f32>, control: Point<f32>, end: Point<f32>) -> bool {
    // NaN coordinates compare false and are never flat; the depth cap ends
    // the subdivision for those
    (control - begin).cross(end - begin).abs() <= FLATNESS_THRESHOLD
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::BezPen;

    fn outline_with_curve(control: Point<f32>) -> Outline {
        let mut outline = Outline::new();
        let b = outline.push_point(Point::new(0.0, 0.0));
        let c = outline.push_point(control);
        let e = outline.push_point(Point::new(10.0, 0.0));
        outline.push_curve(b, e, c);
        outline
    }

    fn lines_only(outline: &Outline) -> bool {
        outline
            .segments()
            .iter()
            .all(|segment| matches!(segment, Segment::Line { .. }))
    }

    #[test]
    fn collinear_curve_is_one_line() {
        let mut outline = outline_with_curve(Point::new(5.0, 0.0));
        outline.tessellate();
        assert_eq!(outline.segments(), &[Segment::Line { begin: 0, end: 2 }]);
        assert_eq!(outline.points().len(), 3);
    }

    #[test]
    fn nearly_flat_curve_is_one_line() {
        // twice the triangle area is 1
        let mut outline = outline_with_curve(Point::new(5.0, 0.1));
        outline.tessellate();
        assert_eq!(outline.segments().len(), 1);
    }

    #[test]
    fn curved_segment_is_subdivided() {
        let mut outline = outline_with_curve(Point::new(5.0, 10.0));
        outline.tessellate();
        let segments = outline.segments();
        assert!(segments.len() > 2);
        assert!(lines_only(&outline));
        // the lines form a connected path from the begin to the end point
        assert_eq!(segments.first().unwrap().begin(), 0);
        assert_eq!(segments.last().unwrap().end(), 2);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end(), pair[1].begin());
        }
        // the midpoint of the curve is on the path
        let apex = Point::new(5.0, 5.0);
        assert!(outline.points().contains(&apex));
    }

    #[test]
    fn subdivision_depth_is_bounded() {
        let mut outline = outline_with_curve(Point::new(5.0, f32::MAX));
        outline.tessellate();
        assert!(lines_only(&outline));
        assert!(outline.segments().len() <= 1 << MAX_TESSELLATION_DEPTH);
        let mut outline = outline_with_curve(Point::new(f32::NAN, 5.0));
        outline.tessellate();
        assert_eq!(outline.segments().len(), 1 << MAX_TESSELLATION_DEPTH);
    }

    #[test]
    fn draw_to_pen() {
        use kurbo::PathEl::*;
        let mut outline = Outline::new();
        let a = outline.push_point(Point::new(0.0, 0.0));
        let b = outline.push_point(Point::new(0.0, 10.0));
        let c = outline.push_point(Point::new(10.0, 10.0));
        outline.push_line(a, b);
        outline.push_curve(b, a, c);
        let d = outline.push_point(Point::new(20.0, 0.0));
        let e = outline.push_point(Point::new(30.0, 0.0));
        outline.push_line(d, e);
        outline.push_line(e, d);
        let mut pen = BezPen::default();
        outline.draw(&mut pen);
        assert_eq!(
            pen.path.elements(),
            &[
                MoveTo((0.0, 0.0).into()),
                LineTo((0.0, 10.0).into()),
                QuadTo((10.0, 10.0).into(), (0.0, 0.0).into()),
                ClosePath,
                MoveTo((20.0, 0.0).into()),
                LineTo((30.0, 0.0).into()),
                LineTo((20.0, 0.0).into()),
                ClosePath,
            ]
        );
    }

    #[test]
    fn draw_empty() {
        let mut pen = BezPen::default();
        Outline::new().draw(&mut pen);
        assert!(pen.path.elements().is_empty());
    }
}
