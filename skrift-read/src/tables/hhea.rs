//! The [hhea (Horizontal Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table.
#[derive(Clone, Copy)]
pub struct Hhea<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Hhea<'_> {
    const TAG: Tag = Tag::new(b"hhea");
}

impl Hhea<'_> {
    const MIN_LEN: usize = 36;

    /// Typographic ascent.
    pub fn ascender(&self) -> i16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Typographic descent.
    pub fn descender(&self) -> i16 {
        self.data.read_at(6).unwrap_or_default()
    }

    /// Typographic line gap. Negative values are treated as zero by some
    /// legacy platforms.
    pub fn line_gap(&self) -> i16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// Maximum advance width value in the hmtx table.
    pub fn advance_width_max(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// Number of long metric records in the hmtx table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.data.read_at(34).unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Hhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::MIN_LEN {
            return Err(data.out_of_bounds(0, Self::MIN_LEN));
        }
        Ok(Hhea { data })
    }
}
