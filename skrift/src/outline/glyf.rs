//! Decoding of TrueType outlines from the `glyf` table.

use raw::{
    tables::glyf::{Anchor, CompositeGlyph, Glyph, SimpleGlyph, SimpleGlyphFlags},
    types::Point,
};

use super::{DrawError, Outline, GLYF_COMPOSITE_RECURSION_LIMIT};
use crate::{transform::Transform, Font, GlyphId};

/// Appends the outline of `glyph` to `outline`, in font units.
///
/// Glyphs without outline data add nothing. `depth` is the number of
/// composite glyphs enclosing this one.
pub(crate) fn decode_glyph(
    font: &Font,
    glyph: GlyphId,
    depth: usize,
    outline: &mut Outline,
) -> Result<(), DrawError> {
    match font.glyph(glyph)? {
        None => Ok(()),
        Some(Glyph::Simple(simple)) => decode_simple(glyph, &simple, outline),
        Some(Glyph::Composite(composite)) => {
            decode_composite(font, glyph, &composite, depth, outline)
        }
    }
}

fn decode_simple(
    glyph: GlyphId,
    simple: &SimpleGlyph,
    outline: &mut Outline,
) -> Result<(), DrawError> {
    let end_pts = simple.end_pts_of_contours();
    // contour end points must be strictly increasing
    let mut prev_end = -1i32;
    for (contour, end) in end_pts.iter().enumerate() {
        let end = end.get() as i32;
        if end < prev_end + 1 {
            return Err(DrawError::MalformedContour { glyph, contour });
        }
        prev_end = end;
    }
    let num_points = simple.num_points();
    let mut points = vec![Point::default(); num_points];
    let mut flags = vec![0u8; num_points];
    simple.read_points(&mut points, &mut flags)?;
    let base = outline.points().len();
    outline.extend_points(points.iter().map(|point| point.map(|c| c as f32)));
    let mut start = 0;
    for end in end_pts {
        let end = end.get() as usize + 1;
        decode_contour(outline, &flags[start..end], base + start);
        start = end;
    }
    Ok(())
}

/// Converts one contour of on and off curve points into segments.
///
/// `first` is the index in the outline of the contour's first point. Two
/// consecutive off curve points imply an on curve point halfway between
/// them, which is added to the outline.
fn decode_contour(outline: &mut Outline, flags: &[u8], first: usize) {
    // fewer than two points enclose no area
    if flags.len() < 2 {
        return;
    }
    let is_on_curve = |flag: &u8| *flag & SimpleGlyphFlags::ON_CURVE_POINT.bits() != 0;
    let last = first + flags.len() - 1;
    let (loose_end, first, flags) = if is_on_curve(&flags[0]) {
        (first, first + 1, &flags[1..])
    } else if is_on_curve(&flags[flags.len() - 1]) {
        (last, first, &flags[..flags.len() - 1])
    } else {
        let points = outline.points();
        let midpoint = points[first].midpoint(points[last]);
        (outline.push_point(midpoint), first, flags)
    };
    let mut begin = loose_end;
    let mut control: Option<usize> = None;
    for (i, flag) in flags.iter().enumerate() {
        let current = first + i;
        if is_on_curve(flag) {
            match control.take() {
                Some(control) => outline.push_curve(begin, current, control),
                None => outline.push_line(begin, current),
            }
            begin = current;
        } else {
            if let Some(control) = control {
                let points = outline.points();
                let center = points[control].midpoint(points[current]);
                let center = outline.push_point(center);
                outline.push_curve(begin, center, control);
                begin = center;
            }
            control = Some(current);
        }
    }
    match control {
        Some(control) => outline.push_curve(begin, loose_end, control),
        None => outline.push_line(begin, loose_end),
    }
}

fn decode_composite(
    font: &Font,
    glyph: GlyphId,
    composite: &CompositeGlyph,
    depth: usize,
    outline: &mut Outline,
) -> Result<(), DrawError> {
    if depth >= GLYF_COMPOSITE_RECURSION_LIMIT {
        return Err(DrawError::RecursionLimitExceeded(glyph));
    }
    for component in composite.components() {
        let component = component?;
        let Anchor::Offset { x, y } = component.anchor else {
            return Err(DrawError::UnsupportedComposition(glyph));
        };
        let start = outline.points().len();
        decode_glyph(font, component.glyph, depth + 1, outline)?;
        let matrix = component.transform;
        let transform = Transform::new(
            matrix.xx.to_f32(),
            matrix.yx.to_f32(),
            matrix.xy.to_f32(),
            matrix.yy.to_f32(),
            x as f32,
            y as f32,
        );
        // only the points added by this component move
        transform.transform_points(&mut outline.points_mut()[start..]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use skrift_test_data::test_font::{self, glyphs};

    use super::super::Segment;
    use super::*;
    use crate::testing::init_logger;

    fn decode(glyph: GlyphId) -> Result<Outline, DrawError> {
        init_logger();
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        let mut outline = Outline::new();
        decode_glyph(&font, glyph, 0, &mut outline)?;
        Ok(outline)
    }

    fn pt(x: f32, y: f32) -> Point<f32> {
        Point::new(x, y)
    }

    fn line(begin: usize, end: usize) -> Segment {
        Segment::Line { begin, end }
    }

    fn curve(begin: usize, end: usize, control: usize) -> Segment {
        Segment::Curve {
            begin,
            end,
            control,
        }
    }

    #[test]
    fn empty_glyph() {
        let outline = decode(glyphs::NOTDEF).unwrap();
        assert!(outline.is_empty());
        assert!(outline.points().is_empty());
    }

    #[test]
    fn on_curve_contour_closes_to_first_point() {
        let outline = decode(glyphs::SQUARE).unwrap();
        assert_eq!(
            outline.points(),
            &[pt(100.0, 0.0), pt(100.0, 700.0), pt(600.0, 700.0), pt(600.0, 0.0)]
        );
        assert_eq!(
            outline.segments(),
            &[line(0, 1), line(1, 2), line(2, 3), line(3, 0)]
        );
    }

    #[test]
    fn off_curve_contour_starts_at_synthetic_midpoint() {
        let outline = decode(glyphs::ROUND).unwrap();
        assert_eq!(
            &outline.points()[4..],
            &[
                pt(500.0, 0.0),
                pt(0.0, 500.0),
                pt(500.0, 1000.0),
                pt(1000.0, 500.0)
            ]
        );
        assert_eq!(
            outline.segments(),
            &[curve(4, 5, 0), curve(5, 6, 1), curve(6, 7, 2), curve(7, 4, 3)]
        );
    }

    #[test]
    fn mixed_contour() {
        let outline = decode(glyphs::ARCH).unwrap();
        assert_eq!(outline.points().len(), 3);
        assert_eq!(outline.segments(), &[curve(0, 2, 1), line(2, 0)]);
    }

    #[test]
    fn contour_ending_on_curve() {
        // off, on, off, on: the last point closes the contour
        let mut outline = Outline::new();
        outline.extend_points([pt(0.0, 0.0), pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0)]);
        decode_contour(&mut outline, &[0, 1, 0, 1], 0);
        assert_eq!(outline.segments(), &[curve(3, 1, 0), curve(1, 3, 2)]);
    }

    #[test]
    fn short_contours_are_invisible() {
        let mut outline = Outline::new();
        outline.extend_points([pt(0.0, 0.0)]);
        decode_contour(&mut outline, &[1], 0);
        decode_contour(&mut outline, &[], 1);
        assert!(outline.is_empty());
    }

    #[test]
    fn compound_components_are_transformed() {
        let outline = decode(glyphs::COMPOUND).unwrap();
        // the square is placed as is
        assert_eq!(outline.points()[1], pt(100.0, 700.0));
        // the arch is scaled by half and moved right
        assert_eq!(
            &outline.points()[4..],
            &[pt(600.0, 0.0), pt(725.0, 250.0), pt(850.0, 0.0)]
        );
        assert_eq!(
            outline.segments(),
            &[
                line(0, 1),
                line(1, 2),
                line(2, 3),
                line(3, 0),
                curve(4, 6, 5),
                line(6, 4)
            ]
        );
    }

    #[test]
    fn nested_compound() {
        let outline = decode(glyphs::NESTED_COMPOUND).unwrap();
        assert_eq!(outline.points().len(), 7);
        assert_eq!(outline.points()[0], pt(100.0, 100.0));
        assert_eq!(outline.points()[5], pt(725.0, 350.0));
    }

    #[test]
    fn self_reference_hits_recursion_limit() {
        assert_eq!(
            decode(glyphs::SELF_REFERENCE).unwrap_err(),
            DrawError::RecursionLimitExceeded(glyphs::SELF_REFERENCE)
        );
    }

    #[test]
    fn indirect_cycle_hits_recursion_limit() {
        // the cycle is cut where it reaches the depth limit
        assert_eq!(
            decode(glyphs::CYCLE_A).unwrap_err(),
            DrawError::RecursionLimitExceeded(glyphs::CYCLE_A)
        );
        assert_eq!(
            decode(glyphs::CYCLE_B).unwrap_err(),
            DrawError::RecursionLimitExceeded(glyphs::CYCLE_B)
        );
    }

    #[test]
    fn nesting_up_to_the_recursion_limit() {
        // four compound levels put the simple glyphs at depth 4
        let outline = decode(glyphs::FOUR_LEVELS).unwrap();
        let nested = decode(glyphs::NESTED_COMPOUND).unwrap();
        assert_eq!(outline.points(), nested.points());
        assert_eq!(outline.segments().len(), nested.segments().len());
        // one more level puts COMPOUND itself at depth 4
        assert_eq!(
            decode(glyphs::FIVE_LEVELS).unwrap_err(),
            DrawError::RecursionLimitExceeded(glyphs::COMPOUND)
        );
    }

    #[test]
    fn falling_end_points() {
        assert_eq!(
            decode(glyphs::BAD_CONTOUR).unwrap_err(),
            DrawError::MalformedContour {
                glyph: glyphs::BAD_CONTOUR,
                contour: 1
            }
        );
    }

    #[test]
    fn point_matching_is_unsupported() {
        assert_eq!(
            decode(glyphs::POINT_MATCHING).unwrap_err(),
            DrawError::UnsupportedComposition(glyphs::POINT_MATCHING)
        );
    }

    #[test]
    fn missing_glyph() {
        assert_eq!(
            decode(GlyphId::new(500)).unwrap_err(),
            DrawError::GlyphNotFound(GlyphId::new(500))
        );
    }
}
