//! A small TrueType font assembled from raw tables.
//!
//! Units per em is 1000 so that a scale of 1000 maps font units directly to
//! device units.

use skrift_types::{GlyphId, Tag};

use crate::{be_buffer, bebuffer::BeBuffer, cmap, FontBuilder};

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;
pub const LINE_GAP: i16 = 90;

/// Glyph identifiers in the test font.
pub mod glyphs {
    use skrift_types::GlyphId;

    /// Empty glyph.
    pub const NOTDEF: GlyphId = GlyphId::new(0);
    /// On-curve square from (100, 0) to (600, 700). Mapped from 'A'.
    pub const SQUARE: GlyphId = GlyphId::new(1);
    /// Four off-curve points at the corners of (0, 0, 1000, 1000). Mapped
    /// from 'O'.
    pub const ROUND: GlyphId = GlyphId::new(2);
    /// (0, 0) on, (250, 500) off, (500, 0) on. The header box holds the
    /// control point. Mapped from 'V'.
    pub const ARCH: GlyphId = GlyphId::new(3);
    /// `SQUARE` as is, plus `ARCH` at half scale moved right by 600.
    /// Mapped from 'C'.
    pub const COMPOUND: GlyphId = GlyphId::new(4);
    /// A compound glyph whose only component is itself.
    pub const SELF_REFERENCE: GlyphId = GlyphId::new(5);
    /// Contour end points `[5, 3]`.
    pub const BAD_CONTOUR: GlyphId = GlyphId::new(6);
    /// A compound glyph positioned by matching points.
    pub const POINT_MATCHING: GlyphId = GlyphId::new(7);
    /// `SQUARE` with x_min and x_max swapped in the header.
    pub const BROKEN_BBOX: GlyphId = GlyphId::new(8);
    /// `COMPOUND` moved up by 100.
    pub const NESTED_COMPOUND: GlyphId = GlyphId::new(9);
    /// A compound glyph whose only component is `CYCLE_B`.
    pub const CYCLE_A: GlyphId = GlyphId::new(10);
    /// A compound glyph whose only component is `CYCLE_A`.
    pub const CYCLE_B: GlyphId = GlyphId::new(11);
    /// `NESTED_COMPOUND` as is: three levels of compound glyphs.
    pub const THREE_LEVELS: GlyphId = GlyphId::new(12);
    /// `THREE_LEVELS` as is.
    pub const FOUR_LEVELS: GlyphId = GlyphId::new(13);
    /// `FOUR_LEVELS` as is.
    pub const FIVE_LEVELS: GlyphId = GlyphId::new(14);

    pub const COUNT: u16 = 15;
}

/// The codepoint to glyph mappings in the test font's cmap.
pub const CHARMAP: &[(u16, GlyphId)] = &[
    (0x41, glyphs::SQUARE),
    (0x43, glyphs::COMPOUND),
    (0x4F, glyphs::ROUND),
    (0x56, glyphs::ARCH),
];

/// Advance widths and left side bearings for every glyph.
pub const H_METRICS: &[(u16, i16)] = &[
    (500, 0),
    (700, 100),
    (1100, 0),
    // the remaining glyphs share the last advance
    (1100, 0),
    (1100, 100),
    (1100, 0),
    (1100, 0),
    (1100, 0),
    (1100, 600),
    (1100, 100),
    (1100, 0),
    (1100, 0),
    (1100, 100),
    (1100, 100),
    (1100, 100),
];

const NUMBER_OF_H_METRICS: u16 = 3;

// composite glyph flags
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;

/// Encode a simple glyph with 16-bit coordinate deltas.
///
/// Each point is `(x, y, on_curve)` in absolute font units.
pub fn simple_glyph(bbox: [i16; 4], end_pts: &[u16], points: &[(i16, i16, bool)]) -> BeBuffer {
    let mut buf = BeBuffer::new()
        .push(end_pts.len() as i16)
        .extend(bbox)
        .extend(end_pts.iter().copied())
        .push(0u16)
        .extend(points.iter().map(|(_, _, on)| *on as u8));
    let mut prev = (0i16, 0i16);
    let mut ys = Vec::with_capacity(points.len());
    for (x, y, _) in points {
        buf = buf.push(x - prev.0);
        ys.push(y - prev.1);
        prev = (*x, *y);
    }
    buf.extend(ys)
}

/// The glyphs of the test font, in glyph id order.
pub fn glyphs() -> Vec<BeBuffer> {
    let square = [
        (100, 0, true),
        (100, 700, true),
        (600, 700, true),
        (600, 0, true),
    ];
    vec![
        BeBuffer::new(),
        simple_glyph([100, 0, 600, 700], &[3], &square),
        simple_glyph(
            [0, 0, 1000, 1000],
            &[3],
            &[
                (0, 0, false),
                (0, 1000, false),
                (1000, 1000, false),
                (1000, 0, false),
            ],
        ),
        simple_glyph(
            [0, 0, 500, 500],
            &[2],
            &[(0, 0, true), (250, 500, false), (500, 0, true)],
        ),
        be_buffer! {
            -1i16, [100i16, 0, 850, 700],
            ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | MORE_COMPONENTS,
            glyphs::SQUARE, 0i16, 0i16,
            ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE,
            glyphs::ARCH, 600i16, 0i16,
            0x2000u16 // 0.5
        },
        be_buffer! {
            -1i16, [0i16, 0, 10, 10],
            ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES,
            glyphs::SELF_REFERENCE, 0i16, 0i16
        },
        simple_glyph(
            [0, 0, 10, 10],
            &[5, 3],
            &[(0, 0, true), (0, 10, true), (10, 10, true), (10, 0, true)],
        ),
        be_buffer! {
            -1i16, [0i16, 0, 10, 10],
            0u16, glyphs::SQUARE, 0u8, 0u8
        },
        simple_glyph([600, 0, 100, 700], &[3], &square),
        be_buffer! {
            -1i16, [100i16, 100, 850, 800],
            ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES,
            glyphs::COMPOUND, 0i16, 100i16
        },
        compound_of(glyphs::CYCLE_B, [0, 0, 10, 10]),
        compound_of(glyphs::CYCLE_A, [0, 0, 10, 10]),
        compound_of(glyphs::NESTED_COMPOUND, [100, 100, 850, 800]),
        compound_of(glyphs::THREE_LEVELS, [100, 100, 850, 800]),
        compound_of(glyphs::FOUR_LEVELS, [100, 100, 850, 800]),
    ]
}

/// A compound glyph with a single untransformed component.
fn compound_of(component: GlyphId, bbox: [i16; 4]) -> BeBuffer {
    BeBuffer::new()
        .push(-1i16)
        .extend(bbox)
        .push(ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES)
        .push(component)
        .extend([0i16, 0])
}

/// Concatenate glyphs into `glyf` and `loca` tables.
///
/// Each glyph is padded to an even length so the short loca format can
/// address it.
pub fn glyf_and_loca(glyphs: &[BeBuffer], long_loca: bool) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }
    let loca = if long_loca {
        BeBuffer::new().extend(offsets)
    } else {
        BeBuffer::new().extend(offsets.into_iter().map(|offset| (offset / 2) as u16))
    };
    (glyf, loca.into_vec())
}

pub fn head(index_to_loc_format: i16) -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32) // version
        .push(0x00010000u32) // font revision
        .push(0u32) // checksum adjustment
        .push(0x5F0F3CF5u32)
        .push(0u16) // flags
        .push(UNITS_PER_EM)
        .extend([0u32; 4]) // created, modified
        .extend([0i16, -200, 1000, 1000])
        .extend([0u16; 3])
        .push(index_to_loc_format)
        .push(0i16)
}

pub fn hhea() -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32)
        .extend([ASCENDER, DESCENDER, LINE_GAP])
        .push(1100u16) // advance width max
        .extend([0i16; 11])
        .push(NUMBER_OF_H_METRICS)
}

pub fn hmtx() -> BeBuffer {
    let (long, short) = H_METRICS.split_at(NUMBER_OF_H_METRICS as usize);
    let mut buf = BeBuffer::new();
    for (advance, lsb) in long {
        buf = buf.push(*advance).push(*lsb);
    }
    buf.extend(short.iter().map(|(_, lsb)| *lsb))
}

/// A kern table with a horizontal subtable, a cross-stream subtable and a
/// minimum subtable that must be ignored.
pub fn kern() -> BeBuffer {
    be_buffer! {
        0u16, 3u16,
        // horizontal
        0u16, 26u16, 0u8, 0x01u8, 2u16, 12u16, 1u16, 0u16,
        glyphs::SQUARE, glyphs::ROUND, -50i16,
        glyphs::SQUARE, glyphs::ARCH, 20i16,
        // cross-stream
        0u16, 20u16, 0u8, 0x05u8, 1u16, 6u16, 0u16, 0u16,
        glyphs::ROUND, glyphs::SQUARE, 10i16,
        // minimum
        0u16, 20u16, 0u8, 0x03u8, 1u16, 6u16, 0u16, 0u16,
        glyphs::ARCH, glyphs::SQUARE, 99i16
    }
}

pub fn cmap() -> BeBuffer {
    let pairs = CHARMAP
        .iter()
        .map(|(cp, gid)| (*cp, gid.to_u16()))
        .collect::<Vec<_>>();
    let subtable = cmap::cmap4_from_pairs(&pairs);
    cmap::cmap_with_subtables(&[(0, 3, subtable.as_slice())])
}

/// A builder holding every table of the test font, so tests can replace or
/// remove tables before building.
pub fn builder() -> FontBuilder<'static> {
    let (glyf, loca) = glyf_and_loca(&glyphs(), false);
    let mut builder = FontBuilder::new();
    builder
        .add_raw(Tag::new(b"head"), head(0).into_vec())
        .add_raw(Tag::new(b"hhea"), hhea().into_vec())
        .add_raw(Tag::new(b"hmtx"), hmtx().into_vec())
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf)
        .add_raw(Tag::new(b"cmap"), cmap().into_vec())
        .add_raw(Tag::new(b"kern"), kern().into_vec());
    builder
}

/// The complete test font.
pub fn build() -> Vec<u8> {
    builder().build()
}

/// The test font with a long format `loca` table.
pub fn build_with_long_loca() -> Vec<u8> {
    let (glyf, loca) = glyf_and_loca(&glyphs(), true);
    builder()
        .add_raw(Tag::new(b"head"), head(1).into_vec())
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf)
        .build()
}

/// Returns the glyph mapped from `codepoint` in [`CHARMAP`].
pub fn charmap_glyph(codepoint: u16) -> Option<GlyphId> {
    CHARMAP
        .iter()
        .find(|(cp, _)| *cp == codepoint)
        .map(|(_, gid)| *gid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(head(0).len(), 54);
        assert_eq!(hhea().len(), 36);
        assert_eq!(hmtx().len(), 3 * 4 + 12 * 2);
        assert_eq!(glyphs().len(), glyphs::COUNT as usize);
        assert_eq!(H_METRICS.len(), glyphs::COUNT as usize);
    }

    #[test]
    fn loca_offsets() {
        let (glyf, loca) = glyf_and_loca(&glyphs(), true);
        assert_eq!(loca.len(), 4 * (glyphs::COUNT as usize + 1));
        // notdef is empty
        assert_eq!(&loca[0..8], &[0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&loca[loca.len() - 4..], &(glyf.len() as u32).to_be_bytes());
        let (_, short) = glyf_and_loca(&glyphs(), false);
        assert_eq!(short.len(), 2 * (glyphs::COUNT as usize + 1));
    }

    #[test]
    fn kern_subtable_lengths() {
        assert_eq!(kern().len(), 4 + 26 + 20 + 20);
    }
}
