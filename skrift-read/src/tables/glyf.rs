//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{BigEndian, BoundingBox, F2Dot14, GlyphId, Point, Tag};

use crate::{tables::flag_set, Cursor, FontData, FontRead, ReadError, TopLevelTable};

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table
#[derive(Clone, Copy)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    /// The data that [loca](super::loca) offsets are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

flag_set! {
    /// Flags used in [SimpleGlyph]
    SimpleGlyphFlags: u8, [u8; 1] {
        /// Bit 0: If set, the point is on the curve; otherwise, it is off
        /// the curve.
        const ON_CURVE_POINT = 0x01;
        /// Bit 1: If set, the corresponding x-coordinate is 1 byte long,
        /// and the sign is determined by the
        /// X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR flag.
        const X_SHORT_VECTOR = 0x02;
        /// Bit 2: If set, the corresponding y-coordinate is 1 byte long,
        /// and the sign is determined by the
        /// Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR flag.
        const Y_SHORT_VECTOR = 0x04;
        /// Bit 3: If set, the next byte (read as unsigned) specifies the
        /// number of additional times this flag byte is to be repeated.
        const REPEAT_FLAG = 0x08;
        /// Bit 4: with X_SHORT_VECTOR set, the sign of the delta (set is
        /// positive); otherwise, set means the x-coordinate is unchanged.
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        /// Bit 5: with Y_SHORT_VECTOR set, the sign of the delta (set is
        /// positive); otherwise, set means the y-coordinate is unchanged.
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        /// Bit 6: If set, contours in the glyph description may overlap.
        const OVERLAP_SIMPLE = 0x40;
    }
}

flag_set! {
    /// Flags used in [CompositeGlyph]
    CompositeGlyphFlags: u16, [u8; 2] {
        /// Bit 0: If this is set, the arguments are 16-bit (uint16 or int16);
        /// otherwise, they are bytes (uint8 or int8).
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        /// Bit 1: If this is set, the arguments are signed xy values;
        /// otherwise, they are unsigned point numbers.
        const ARGS_ARE_XY_VALUES = 0x0002;
        /// Bit 2: round the xy values to the grid.
        const ROUND_XY_TO_GRID = 0x0004;
        /// Bit 3: This indicates that there is a simple scale for the
        /// component.
        const WE_HAVE_A_SCALE = 0x0008;
        /// Bit 5: Indicates at least one more glyph after this one.
        const MORE_COMPONENTS = 0x0020;
        /// Bit 6: The x direction will use a different scale from the y
        /// direction.
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        /// Bit 7: There is a 2 by 2 transformation that will be used to
        /// scale the component.
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        /// Bit 8: Following the last component are instructions for the
        /// composite character.
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        /// Bit 9: use this component's metrics for the composite glyph.
        const USE_MY_METRICS = 0x0200;
        /// Bit 10: the components of the compound glyph overlap.
        const OVERLAP_COMPOUND = 0x0400;
        /// Bit 11: The composite is designed to have the component offset
        /// scaled.
        const SCALED_COMPONENT_OFFSET = 0x0800;
        /// Bit 12: The composite is designed not to have the component
        /// offset scaled.
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

const GLYPH_HEADER_LEN: usize = 10;

/// A glyph outline in the `glyf` table.
#[derive(Clone)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.read_at::<i16>(0)? >= 0 {
            SimpleGlyph::read(data).map(Glyph::Simple)
        } else {
            CompositeGlyph::read(data).map(Glyph::Composite)
        }
    }
}

macro_rules! field_getter {
    ($field:ident, $ty:ty) => {
        pub fn $field(&self) -> $ty {
            match self {
                Self::Simple(table) => table.$field(),
                Self::Composite(table) => table.$field(),
            }
        }
    };
}

impl Glyph<'_> {
    field_getter!(number_of_contours, i16);
    field_getter!(bbox, BoundingBox<i16>);
}

/// Reads the fields of the header shared by simple and composite glyphs.
#[derive(Clone, Copy)]
struct GlyphHeader<'a> {
    data: FontData<'a>,
}

impl<'a> GlyphHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < GLYPH_HEADER_LEN {
            return Err(data.out_of_bounds(0, GLYPH_HEADER_LEN));
        }
        Ok(Self { data })
    }

    fn number_of_contours(&self) -> i16 {
        self.data.read_at(0).unwrap_or_default()
    }

    fn bbox(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.data.read_at(2).unwrap_or_default(),
            y_min: self.data.read_at(4).unwrap_or_default(),
            x_max: self.data.read_at(6).unwrap_or_default(),
            y_max: self.data.read_at(8).unwrap_or_default(),
        }
    }
}

/// A glyph defined by its own contours.
#[derive(Clone)]
pub struct SimpleGlyph<'a> {
    header: GlyphHeader<'a>,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    glyph_data: FontData<'a>,
}

impl<'a> FontRead<'a> for SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header = GlyphHeader::read(data)?;
        let n_contours = header.number_of_contours().max(0) as usize;
        let mut cursor = data.cursor();
        cursor.advance_by(GLYPH_HEADER_LEN);
        let end_pts_of_contours = cursor.read_array(n_contours)?;
        // an empty glyph may omit everything after the contour array
        let (instructions, glyph_data) = if n_contours == 0 {
            (Default::default(), Default::default())
        } else {
            let instruction_length = cursor.read::<u16>()? as usize;
            let instructions = cursor.read_array(instruction_length)?;
            (instructions, cursor.remaining().unwrap_or_default())
        };
        Ok(SimpleGlyph {
            header,
            end_pts_of_contours,
            instructions,
            glyph_data,
        })
    }
}

impl<'a> SimpleGlyph<'a> {
    pub fn number_of_contours(&self) -> i16 {
        self.header.number_of_contours()
    }

    pub fn bbox(&self) -> BoundingBox<i16> {
        self.header.bbox()
    }

    /// The index of the last point of each contour.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    /// TrueType hinting instructions. These are never executed here.
    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    /// The packed flag and coordinate data.
    pub fn glyph_data(&self) -> &'a [u8] {
        self.glyph_data.as_bytes()
    }

    /// Returns the total number of points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Reads points and flags into the provided buffers.
    ///
    /// Coordinates are absolute, in font units. Drops all flag bits except
    /// on-curve. The lengths of the buffers must be equal to the value
    /// returned by [num_points](Self::num_points).
    pub fn read_points(&self, points: &mut [Point<i32>], flags: &mut [u8]) -> Result<(), ReadError> {
        let n_points = self.num_points();
        if points.len() != n_points || flags.len() != n_points {
            return Err(ReadError::InvalidArrayLen);
        }
        let mut cursor = self.glyph_data.cursor();
        let mut i = 0;
        while i < n_points {
            let flag = cursor.read::<SimpleGlyphFlags>()?;
            let flag_bits = flag.bits();
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                let count = (cursor.read::<u8>()? as usize + 1).min(n_points - i);
                for f in &mut flags[i..i + count] {
                    *f = flag_bits;
                }
                i += count;
            } else {
                flags[i] = flag_bits;
                i += 1;
            }
        }
        let mut x = 0i32;
        for (&flag_bits, point) in flags.iter().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(flag_bits);
            x = x.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            )?);
            point.x = x;
        }
        let mut y = 0i32;
        for (flag_bits, point) in flags.iter_mut().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(*flag_bits);
            y = y.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            )?);
            point.y = y;
            // Only keep the on-curve bit
            *flag_bits &= SimpleGlyphFlags::ON_CURVE_POINT.bits();
        }
        Ok(())
    }
}

fn read_delta(
    cursor: &mut Cursor,
    flag: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<i32, ReadError> {
    Ok(if flag.contains(short) {
        let magnitude = cursor.read::<u8>()?;
        short_delta(magnitude, flag.contains(same_or_positive))
    } else if flag.contains(same_or_positive) {
        0
    } else {
        cursor.read::<i16>()? as i32
    })
}

/// Applies the sign bit of a one byte delta with a two's complement mask.
#[inline(always)]
fn short_delta(magnitude: u8, positive: bool) -> i32 {
    let mask = positive as i32 - 1;
    (magnitude as i32 ^ mask) - mask
}

/// A glyph built from transformed references to other glyphs.
#[derive(Clone)]
pub struct CompositeGlyph<'a> {
    header: GlyphHeader<'a>,
    component_data: FontData<'a>,
}

impl<'a> FontRead<'a> for CompositeGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header = GlyphHeader::read(data)?;
        let component_data = data.split_off(GLYPH_HEADER_LEN).unwrap_or_default();
        Ok(CompositeGlyph {
            header,
            component_data,
        })
    }
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Debug)]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// Anchor position for a composite component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Offset { x: i16, y: i16 },
    Point { base: u16, component: u16 },
}

impl<'a> CompositeGlyph<'a> {
    pub fn number_of_contours(&self) -> i16 {
        self.header.number_of_contours()
    }

    pub fn bbox(&self) -> BoundingBox<i16> {
        self.header.bbox()
    }

    /// Returns an iterator over the components of the composite glyph.
    ///
    /// A component that cannot be read yields an error and ends the
    /// iteration.
    pub fn components(&self) -> impl Iterator<Item = Result<Component, ReadError>> + 'a + Clone {
        ComponentIter {
            done: false,
            cursor: self.component_data.cursor(),
        }
    }
}

#[derive(Clone)]
struct ComponentIter<'a> {
    done: bool,
    cursor: Cursor<'a>,
}

impl ComponentIter<'_> {
    fn read_component(&mut self) -> Result<Component, ReadError> {
        let flags: CompositeGlyphFlags = self.cursor.read()?;
        let glyph = self.cursor.read::<GlyphId>()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: self.cursor.read()?,
                y: self.cursor.read()?,
            },
            (true, false) => Anchor::Offset {
                x: self.cursor.read::<i8>()? as _,
                y: self.cursor.read::<i8>()? as _,
            },
            (false, true) => Anchor::Point {
                base: self.cursor.read()?,
                component: self.cursor.read()?,
            },
            (false, false) => Anchor::Point {
                base: self.cursor.read::<u8>()? as _,
                component: self.cursor.read::<u8>()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = self.cursor.read()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = self.cursor.read()?;
            transform.yy = self.cursor.read()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = self.cursor.read()?;
            transform.yx = self.cursor.read()?;
            transform.xy = self.cursor.read()?;
            transform.yy = self.cursor.read()?;
        }
        Ok(Component {
            flags,
            glyph,
            anchor,
            transform,
        })
    }
}

impl Iterator for ComponentIter<'_> {
    type Item = Result<Component, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let component = self.read_component();
        self.done = !matches!(
            &component,
            Ok(component) if component.flags.contains(CompositeGlyphFlags::MORE_COMPONENTS)
        );
        Some(component)
    }
}
