//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use types::{BigEndian, GlyphId, Tag};

use crate::{
    tables::glyf::{Glyf, Glyph},
    FontData, FontRead, ReadError, TopLevelTable,
};

/// The [loca] table.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl TopLevelTable for Loca<'_> {
    const TAG: Tag = Tag::new(b"loca");
}

impl<'a> Loca<'a> {
    /// Read the table; `is_long` comes from `indexToLocFormat` in `head`.
    ///
    /// A trailing partial entry is ignored.
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        if is_long {
            data.read_array(0..data.len() & !3).map(Loca::Long)
        } else {
            data.read_array(0..data.len() & !1).map(Loca::Short)
        }
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph id.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    /// Returns the outline data for the given glyph.
    ///
    /// Glyphs with no outline (where the offset equals the offset of the
    /// following glyph) return `Ok(None)`.
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Option<Glyph<'a>>, ReadError> {
        let idx = gid.to_u16() as usize;
        let start = self.get_raw(idx).ok_or_else(|| self.out_of_bounds(idx))?;
        let end = self
            .get_raw(idx + 1)
            .ok_or_else(|| self.out_of_bounds(idx + 1))?;
        if start == end {
            return Ok(None);
        }
        let data = glyf.offset_data();
        let glyph_data = data
            .slice(start as usize..end as usize)
            .ok_or_else(|| data.out_of_bounds(start as usize, end.saturating_sub(start) as usize))?;
        Glyph::read(glyph_data).map(Some)
    }

    fn out_of_bounds(&self, idx: usize) -> ReadError {
        let (entry_len, count) = match self {
            Loca::Short(data) => (2, data.len()),
            Loca::Long(data) => (4, data.len()),
        };
        ReadError::OutOfBounds {
            offset: idx * entry_len,
            len: entry_len,
            size: count * entry_len,
        }
    }
}
