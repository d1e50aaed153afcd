//! The [head (Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Copy)]
pub struct Head<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Head<'_> {
    const TAG: Tag = Tag::new(b"head");
}

impl Head<'_> {
    const MIN_LEN: usize = 54;

    /// Should be 0x5F0F3CF5
    pub fn magic_number(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    /// Set to a value from 16 to 16384. Any value in this range is
    /// valid. In fonts that have TrueType outlines, a power of 2 is
    /// recommended as this allows performance optimization in some
    /// rasterizers.
    pub fn units_per_em(&self) -> u16 {
        self.data.read_at(18).unwrap_or_default()
    }

    /// Bounding box for all glyphs in the font.
    pub fn bbox(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.data.read_at(36).unwrap_or_default(),
            y_min: self.data.read_at(38).unwrap_or_default(),
            x_max: self.data.read_at(40).unwrap_or_default(),
            y_max: self.data.read_at(42).unwrap_or_default(),
        }
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.data.read_at(50).unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::MIN_LEN {
            return Err(data.out_of_bounds(0, Self::MIN_LEN));
        }
        Ok(Head { data })
    }
}

#[cfg(test)]
mod tests {
    use skrift_test_data::bebuffer::BeBuffer;

    use super::*;

    #[test]
    fn fields() {
        let buf = BeBuffer::new()
            .extend([0u16; 6])
            .push(0x5F0F3CF5u32)
            .push(0u16) // flags
            .push(2048u16)
            .extend([0u32; 4]) // created, modified
            .extend([-10i16, -200, 1000, 900])
            .extend([0u16; 3])
            .push(1i16)
            .push(0i16);
        assert_eq!(buf.len(), 54);
        let head = Head::read(FontData::new(&buf)).unwrap();
        assert_eq!(head.magic_number(), 0x5F0F3CF5);
        assert_eq!(head.units_per_em(), 2048);
        assert_eq!(head.index_to_loc_format(), 1);
        assert_eq!(head.bbox().y_min, -200);
        assert_eq!(head.bbox().x_max, 1000);
    }

    #[test]
    fn truncated() {
        let buf = [0u8; 53];
        assert!(matches!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::OutOfBounds { len: 54, size: 53, .. })
        ));
    }
}
