//! The rendering facade.

use raw::{
    tables::{glyf::Glyph, hmtx::Hmtx},
    types::BoundingBox,
    ReadError, TopLevelTable,
};

use crate::{
    image::Image,
    metrics::{GlyphMetrics, Kerning, LineMetrics},
    outline::{decode_glyph, DrawError, Outline},
    transform::Transform,
    Font, GlyphId,
};

/// Options that change how [`Sft`] maps glyphs to device space.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SftFlags(u32);

impl SftFlags {
    /// The device Y axis points down, as in most image formats.
    pub const DOWNWARD_Y: Self = Self(1);

    /// No flags set: the device Y axis points up.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for SftFlags {
    fn default() -> Self {
        Self::DOWNWARD_Y
    }
}

impl std::ops::BitOr for SftFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Scale, offset and orientation for turning the glyphs of a [`Font`] into
/// device space metrics, outlines and bitmaps.
///
/// Scales are in device units per em. Offsets are added after scaling and
/// move the glyph relative to its bitmap origin.
#[derive(Copy, Clone, Debug)]
pub struct Sft<'a> {
    font: &'a Font<'a>,
    pub x_scale: f32,
    pub y_scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub flags: SftFlags,
}

impl<'a> Sft<'a> {
    /// Creates a facade rendering at 32 units per em with a downward Y
    /// axis.
    pub fn new(font: &'a Font<'a>) -> Self {
        Self {
            font,
            x_scale: 32.0,
            y_scale: 32.0,
            x_offset: 0.0,
            y_offset: 0.0,
            flags: SftFlags::default(),
        }
    }

    /// Sets the horizontal and vertical scales in device units per em.
    pub fn with_scale(self, x_scale: f32, y_scale: f32) -> Self {
        Self {
            x_scale,
            y_scale,
            ..self
        }
    }

    /// Sets the device space offset added after scaling.
    pub fn with_offset(self, x_offset: f32, y_offset: f32) -> Self {
        Self {
            x_offset,
            y_offset,
            ..self
        }
    }

    /// Replaces the orientation flags.
    pub fn with_flags(self, flags: SftFlags) -> Self {
        Self { flags, ..self }
    }

    pub fn font(&self) -> &'a Font<'a> {
        self.font
    }

    fn is_downward(&self) -> bool {
        self.flags.contains(SftFlags::DOWNWARD_Y)
    }

    fn x_factor(&self) -> f32 {
        self.x_scale / self.font.units_per_em() as f32
    }

    fn y_factor(&self) -> f32 {
        self.y_scale / self.font.units_per_em() as f32
    }

    /// Maps a codepoint to a glyph identifier.
    pub fn lookup(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        self.font.glyph_id(codepoint)
    }

    /// Returns the device space box that holds every pixel the glyph
    /// touches.
    ///
    /// Glyphs without an outline have an empty box at the origin.
    pub fn glyph_bbox(&self, glyph: GlyphId) -> Result<BoundingBox<i32>, DrawError> {
        Ok(self.device_bbox(glyph)?.unwrap_or_default())
    }

    fn device_bbox(&self, glyph: GlyphId) -> Result<Option<BoundingBox<i32>>, DrawError> {
        let Some(outline) = self.font.glyph(glyph)? else {
            return Ok(None);
        };
        if is_empty(&outline) {
            return Ok(None);
        }
        let bbox = outline.bbox();
        if !bbox.is_proper() {
            return Err(DrawError::BrokenBoundingBox(glyph, bbox));
        }
        let (xs, ys) = (self.x_factor(), self.y_factor());
        Ok(Some(BoundingBox {
            x_min: (bbox.x_min as f32 * xs + self.x_offset).floor() as i32,
            y_min: (bbox.y_min as f32 * ys + self.y_offset).floor() as i32,
            x_max: (bbox.x_max as f32 * xs + self.x_offset).ceil() as i32,
            y_max: (bbox.y_max as f32 * ys + self.y_offset).ceil() as i32,
        }))
    }

    /// Returns the horizontal metrics and bitmap size of a glyph.
    ///
    /// Device coordinates saturate at the limits of `i32`, and so does the
    /// bitmap size.
    pub fn glyph_metrics(&self, glyph: GlyphId) -> Result<GlyphMetrics, DrawError> {
        let (advance, lsb) = self
            .font
            .hor_metrics(glyph)
            .ok_or(ReadError::MetricIsMissing(Hmtx::TAG))?;
        let xs = self.x_factor();
        let mut metrics = GlyphMetrics {
            advance_width: advance as f32 * xs,
            left_side_bearing: lsb as f32 * xs + self.x_offset,
            ..Default::default()
        };
        if let Some(bbox) = self.device_bbox(glyph)? {
            metrics.min_width = bbox.x_max.saturating_sub(bbox.x_min).saturating_add(1);
            metrics.min_height = bbox.y_max.saturating_sub(bbox.y_min).saturating_add(1);
            metrics.y_offset = if self.is_downward() {
                bbox.y_max
            } else {
                bbox.y_min
            };
        }
        Ok(metrics)
    }

    /// Returns the scaled ascender, descender and line gap from `hhea`.
    pub fn line_metrics(&self) -> LineMetrics {
        let hhea = self.font.hhea();
        let ys = self.y_factor();
        LineMetrics {
            ascender: hhea.ascender() as f32 * ys,
            descender: hhea.descender() as f32 * ys,
            line_gap: hhea.line_gap() as f32 * ys,
        }
    }

    /// Returns the kerning adjustment between two glyphs in device units.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<Kerning> {
        let kerning = self.font.kerning(left, right)?;
        Some(Kerning {
            x_shift: kerning.x_shift * self.x_factor(),
            y_shift: kerning.y_shift * self.y_factor(),
        })
    }

    /// Returns the transform from font units to the pixel grid of the
    /// glyph's bitmap.
    fn placement(&self, bbox: &BoundingBox<i32>) -> Transform {
        let (xs, ys) = (self.x_factor(), self.y_factor());
        let dx = self.x_offset - bbox.x_min as f32;
        if self.is_downward() {
            Transform::scale_translate(xs, -ys, dx, bbox.y_max as f32 - self.y_offset)
        } else {
            Transform::scale_translate(xs, ys, dx, self.y_offset - bbox.y_min as f32)
        }
    }

    /// Decodes a glyph and places it on the pixel grid used by
    /// [`render`](Self::render).
    ///
    /// Curves are kept, so the result can be drawn to a
    /// [`Pen`](raw::types::Pen).
    pub fn outline(&self, glyph: GlyphId) -> Result<Outline, DrawError> {
        let mut outline = Outline::new();
        let Some(bbox) = self.device_bbox(glyph)? else {
            return Ok(outline);
        };
        decode_glyph(self.font, glyph, 0, &mut outline)?;
        outline.transform(&self.placement(&bbox));
        Ok(outline)
    }

    /// Renders a glyph into `image`.
    ///
    /// The glyph's device bounding box is aligned with the top left (or
    /// bottom left with an upward Y axis) corner of the image. Glyphs
    /// without an outline leave the image untouched.
    pub fn render(&self, glyph: GlyphId, image: &mut Image) -> Result<(), DrawError> {
        let expected = image.width as usize * image.height as usize;
        if image.pixels.len() != expected {
            return Err(DrawError::ImageSizeMismatch {
                expected,
                found: image.pixels.len(),
            });
        }
        let Some(bbox) = self.device_bbox(glyph)? else {
            return Ok(());
        };
        let mut outline = Outline::new();
        decode_glyph(self.font, glyph, 0, &mut outline)?;
        log::trace!(
            "rendering glyph {glyph} with {} segments into {}x{}",
            outline.segments().len(),
            image.width,
            image.height
        );
        outline.render(&self.placement(&bbox), image);
        Ok(())
    }
}

fn is_empty(glyph: &Glyph) -> bool {
    glyph.number_of_contours() == 0
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;
    use pretty_assertions::assert_eq;
    use skrift_test_data::test_font::{self, glyphs};

    use super::*;
    use crate::testing::{init_logger, BezPen};

    fn with_font(f: impl FnOnce(&Font)) {
        init_logger();
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        f(&font);
    }

    fn bbox(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> BoundingBox<i32> {
        BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[test]
    fn defaults() {
        with_font(|font| {
            let sft = Sft::new(font);
            assert_eq!((sft.x_scale, sft.y_scale), (32.0, 32.0));
            assert_eq!((sft.x_offset, sft.y_offset), (0.0, 0.0));
            assert_eq!(sft.flags, SftFlags::DOWNWARD_Y);
            let sft = sft
                .with_scale(10.0, 20.0)
                .with_offset(1.0, 2.0)
                .with_flags(SftFlags::empty());
            assert_eq!((sft.x_scale, sft.y_scale), (10.0, 20.0));
            assert_eq!((sft.x_offset, sft.y_offset), (1.0, 2.0));
            assert!(!sft.is_downward());
        });
    }

    #[test]
    fn lookup() {
        with_font(|font| {
            let sft = Sft::new(font);
            assert_eq!(sft.lookup('A'), Some(glyphs::SQUARE));
            assert_eq!(sft.lookup(0x43u32), Some(glyphs::COMPOUND));
            assert_eq!(sft.lookup('Z'), None);
        });
    }

    #[test]
    fn bbox_rounds_outward() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            assert_eq!(sft.glyph_bbox(glyphs::SQUARE).unwrap(), bbox(25, 0, 150, 175));
            // 12.5 and 62.5 are rounded away from the glyph
            let sft = sft.with_scale(125.0, 125.0);
            assert_eq!(sft.glyph_bbox(glyphs::SQUARE).unwrap(), bbox(12, 0, 75, 88));
            let sft = sft.with_offset(0.5, -0.5);
            assert_eq!(sft.glyph_bbox(glyphs::SQUARE).unwrap(), bbox(13, -1, 76, 87));
        });
    }

    #[test]
    fn empty_glyph() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            assert_eq!(sft.glyph_bbox(glyphs::NOTDEF).unwrap(), BoundingBox::default());
            assert_eq!(
                sft.glyph_metrics(glyphs::NOTDEF).unwrap(),
                GlyphMetrics {
                    advance_width: 125.0,
                    ..Default::default()
                }
            );
            let mut image = Image::new(4, 4);
            sft.render(glyphs::NOTDEF, &mut image).unwrap();
            assert!(image.pixels.iter().all(|pixel| *pixel == 0));
            assert!(sft.outline(glyphs::NOTDEF).unwrap().is_empty());
        });
    }

    #[test]
    fn broken_bbox() {
        with_font(|font| {
            let sft = Sft::new(font);
            let expected = DrawError::BrokenBoundingBox(
                glyphs::BROKEN_BBOX,
                BoundingBox {
                    x_min: 600,
                    y_min: 0,
                    x_max: 100,
                    y_max: 700,
                },
            );
            assert_eq!(sft.glyph_bbox(glyphs::BROKEN_BBOX).unwrap_err(), expected);
            assert_eq!(sft.glyph_metrics(glyphs::BROKEN_BBOX).unwrap_err(), expected);
            let mut image = Image::new(8, 8);
            assert_eq!(sft.render(glyphs::BROKEN_BBOX, &mut image).unwrap_err(), expected);
        });
    }

    #[test]
    fn glyph_metrics() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            let metrics = sft.glyph_metrics(glyphs::SQUARE).unwrap();
            assert_eq!(
                metrics,
                GlyphMetrics {
                    advance_width: 175.0,
                    left_side_bearing: 25.0,
                    y_offset: 175,
                    min_width: 126,
                    min_height: 176,
                }
            );
            let upward = sft.with_flags(SftFlags::empty()).with_offset(4.0, 0.0);
            let metrics = upward.glyph_metrics(glyphs::SQUARE).unwrap();
            assert_eq!(metrics.left_side_bearing, 29.0);
            assert_eq!(metrics.y_offset, 0);
        });
    }

    #[test]
    fn huge_scales_saturate() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(1e10, 1e10);
            let metrics = sft.glyph_metrics(glyphs::SQUARE).unwrap();
            // x_min is 1e9, everything past it is clamped
            assert_eq!(metrics.min_width, i32::MAX - 1_000_000_000 + 1);
            assert_eq!(metrics.min_height, i32::MAX);
            assert_eq!(metrics.y_offset, i32::MAX);
            // pushed entirely past the edge of the device space
            let sft = sft.with_offset(-1e30, -1e30);
            let metrics = sft.glyph_metrics(glyphs::SQUARE).unwrap();
            assert_eq!((metrics.min_width, metrics.min_height), (1, 1));
            assert_eq!(
                sft.glyph_bbox(glyphs::SQUARE).unwrap(),
                bbox(i32::MIN, i32::MIN, i32::MIN, i32::MIN)
            );
        });
    }

    #[test]
    fn metrics_require_hmtx() {
        init_logger();
        let data = test_font::builder()
            .remove(Hmtx::TAG)
            .build();
        let font = Font::new(&data).unwrap();
        assert_eq!(
            Sft::new(&font).glyph_metrics(glyphs::SQUARE).unwrap_err(),
            DrawError::Read(ReadError::MetricIsMissing(Hmtx::TAG))
        );
    }

    #[test]
    fn line_metrics() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(100.0, 250.0);
            assert_eq!(
                sft.line_metrics(),
                LineMetrics {
                    ascender: 200.0,
                    descender: -50.0,
                    line_gap: 22.5,
                }
            );
        });
    }

    #[test]
    fn scaled_kerning() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 500.0);
            assert_eq!(
                sft.kerning(glyphs::SQUARE, glyphs::ROUND),
                Some(Kerning {
                    x_shift: -12.5,
                    y_shift: 0.0
                })
            );
            assert_eq!(
                sft.kerning(glyphs::ROUND, glyphs::SQUARE),
                Some(Kerning {
                    x_shift: 0.0,
                    y_shift: 5.0
                })
            );
            assert_eq!(sft.kerning(glyphs::SQUARE, glyphs::SQUARE), None);
        });
    }

    #[test]
    fn render_codepoint_end_to_end() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(20.0, 20.0);
            let glyph = sft.lookup('A').unwrap();
            let metrics = sft.glyph_metrics(glyph).unwrap();
            let bbox = sft.glyph_bbox(glyph).unwrap();
            assert_eq!(metrics.min_width, bbox.x_max - bbox.x_min + 1);
            assert_eq!(metrics.min_height, bbox.y_max - bbox.y_min + 1);
            let mut image = Image::new(metrics.min_width as u32, metrics.min_height as u32);
            sft.render(glyph, &mut image).unwrap();
            assert_eq!(image.pixels.len(), (metrics.min_width * metrics.min_height) as usize);
            // the square spans 10 by 14 pixels at this scale
            let covered = image.pixels.iter().filter(|pixel| **pixel > 0).count();
            assert!((130..=180).contains(&covered), "{covered}");
            let width = bbox.x_max - bbox.x_min;
            let height = bbox.y_max - bbox.y_min;
            // the last row and column lie past the transformed box
            for (y, row) in image.rows().enumerate() {
                for (x, pixel) in row.iter().enumerate() {
                    if x as i32 >= width || y as i32 >= height {
                        assert_eq!(*pixel, 0, "({x}, {y})");
                    }
                }
            }
        });
    }

    #[test]
    fn render_exact_square() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            let metrics = sft.glyph_metrics(glyphs::SQUARE).unwrap();
            let mut image = Image::new(metrics.min_width as u32, metrics.min_height as u32);
            sft.render(glyphs::SQUARE, &mut image).unwrap();
            for (y, row) in image.rows().enumerate() {
                for (x, pixel) in row.iter().enumerate() {
                    let expected = if x < 125 && y < 175 { 255 } else { 0 };
                    assert_eq!(*pixel, expected, "({x}, {y})");
                }
            }
        });
    }

    #[test]
    fn render_upward() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            let down = render(sft, glyphs::ARCH);
            let up = render(sft.with_flags(SftFlags::empty()), glyphs::ARCH);
            // the control point at y = 500 sets the height
            assert_eq!((down.width, down.height), (126, 126));
            assert_eq!((up.width, up.height), (126, 126));
            assert_eq!(down.get(62, 120), Some(255));
            assert_eq!(down.get(62, 10), Some(0));
            assert_eq!(up.get(62, 4), Some(255));
            assert_eq!(up.get(62, 115), Some(0));
            // both leave the extra last row empty
            let rows = down.height as usize - 1;
            let down_rows = down.rows().take(rows);
            let up_rows = up.rows().take(rows).rev();
            for (y, (down_row, up_row)) in down_rows.zip(up_rows).enumerate() {
                for (x, (a, b)) in down_row.iter().zip(up_row).enumerate() {
                    assert!(a.abs_diff(*b) <= 1, "({x}, {y}): {a} != {b}");
                }
            }
        });
    }

    fn render(sft: Sft, glyph: GlyphId) -> Image {
        let metrics = sft.glyph_metrics(glyph).unwrap();
        let mut image = Image::new(metrics.min_width as u32, metrics.min_height as u32);
        sft.render(glyph, &mut image).unwrap();
        image
    }

    #[test]
    fn render_curves() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(64.0, 64.0);
            let image = render(sft, glyphs::ROUND);
            let center = image.width / 2;
            assert_eq!(image.get(center, center), Some(255));
            assert_eq!(image.get(0, 0), Some(0));
            assert_eq!(image.get(image.width - 1, image.height - 1), Some(0));
        });
    }

    #[test]
    fn render_compound() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            let image = render(sft, glyphs::COMPOUND);
            // bbox 25,0,213,175: the square on the left, the arch at the
            // bottom right
            assert_eq!((image.width, image.height), (189, 176));
            assert_eq!(image.get(10, 10), Some(255));
            assert_eq!(image.get(150, 170), Some(255));
            assert_eq!(image.get(150, 10), Some(0));
        });
    }

    #[test]
    fn render_errors() {
        with_font(|font| {
            let sft = Sft::new(font);
            let mut image = Image {
                width: 4,
                height: 4,
                pixels: vec![0; 3],
            };
            assert_eq!(
                sft.render(glyphs::SQUARE, &mut image).unwrap_err(),
                DrawError::ImageSizeMismatch {
                    expected: 16,
                    found: 3
                }
            );
            let mut image = Image::new(32, 32);
            assert_eq!(
                sft.render(glyphs::SELF_REFERENCE, &mut image).unwrap_err(),
                DrawError::RecursionLimitExceeded(glyphs::SELF_REFERENCE)
            );
        });
    }

    #[test]
    fn outline_in_pixel_space() {
        with_font(|font| {
            let sft = Sft::new(font).with_scale(250.0, 250.0);
            let outline = sft.outline(glyphs::COMPOUND).unwrap();
            let mut pen = BezPen::default();
            outline.draw(&mut pen);
            let rect = pen.path.bounding_box();
            assert_eq!((rect.x0, rect.y0), (0.0, 0.0));
            assert_eq!((rect.x1, rect.y1), (187.5, 175.0));
        });
    }
}
