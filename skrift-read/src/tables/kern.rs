//! The [kern](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) table

use types::{BigEndian, FixedSize, GlyphId, Tag};

use crate::{tables::flag_set, FontData, FontRead, ReadError, TopLevelTable};

/// The OpenType [kerning](https://learn.microsoft.com/en-us/typography/opentype/spec/kern) table.
///
/// Only the Windows version 0 header is understood.
#[derive(Clone)]
pub struct Kern<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Kern<'_> {
    const TAG: Tag = Tag::new(b"kern");
}

impl<'a> FontRead<'a> for Kern<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<u16>(0)?;
        if version != 0 {
            return Err(ReadError::InvalidFormat(version.into()));
        }
        data.read_at::<u16>(2)?;
        Ok(Kern { data })
    }
}

impl<'a> Kern<'a> {
    /// Table version number, always 0.
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    /// Number of subtables in the kerning table.
    pub fn num_tables(&self) -> u16 {
        self.data.read_at(2).unwrap_or_default()
    }

    /// Returns an iterator over the subtables.
    ///
    /// Iteration stops after `num_tables` subtables or at the first
    /// subtable that cannot be read, which is yielded as an error.
    pub fn subtables(&self) -> Subtables<'a> {
        Subtables {
            data: self.data,
            offset: 4,
            remaining: self.num_tables(),
        }
    }
}

flag_set! {
    /// The coverage field of a kerning subtable.
    KernCoverage: u8, [u8; 1] {
        /// Bit 0: the table has horizontal data; otherwise vertical.
        const HORIZONTAL = 0x01;
        /// Bit 1: the table has minimum values; otherwise kerning values.
        const MINIMUM = 0x02;
        /// Bit 2: kerning is perpendicular to the flow of the text.
        const CROSS_STREAM = 0x04;
        /// Bit 3: the value in this table replaces the accumulated value.
        const OVERRIDE = 0x08;
    }
}

/// Iterator over the subtables of a [`Kern`] table.
#[derive(Clone)]
pub struct Subtables<'a> {
    data: FontData<'a>,
    offset: usize,
    remaining: u16,
}

impl<'a> Iterator for Subtables<'a> {
    type Item = Result<Subtable<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.data.read_ref_at::<Subtable>(self.offset) {
            Ok(subtable) => {
                self.offset += subtable.length() as usize;
                Some(Ok(subtable))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

/// A kerning subtable header along with its data.
#[derive(Clone)]
pub struct Subtable<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Subtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // version, length, format and coverage
        data.read_at::<u8>(5)?;
        Ok(Subtable { data })
    }
}

impl<'a> Subtable<'a> {
    /// Kern subtable version number.
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    /// Length of the subtable, in bytes, including this header.
    pub fn length(&self) -> u16 {
        self.data.read_at(2).unwrap_or_default()
    }

    /// Subtable format.
    pub fn format(&self) -> u8 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// What type of information is contained in this table.
    pub fn coverage(&self) -> KernCoverage {
        self.data.read_at(5).unwrap_or_default()
    }

    /// Returns true if this subtable holds horizontal kerning values that
    /// can be applied to glyph pairs.
    pub fn is_horizontal_kerning(&self) -> bool {
        let coverage = self.coverage();
        coverage.contains(KernCoverage::HORIZONTAL) && !coverage.contains(KernCoverage::MINIMUM)
    }

    /// Returns the format 0 pair data, if this is a format 0 subtable.
    pub fn format0(&self) -> Option<Result<Kern0<'a>, ReadError>> {
        (self.format() == 0).then(|| Kern0::read(self.data))
    }
}

/// The format 0 kerning subtable: an ordered list of glyph pairs.
#[derive(Clone)]
pub struct Kern0<'a> {
    data: FontData<'a>,
    pairs: &'a [KernPair],
}

impl<'a> FontRead<'a> for Kern0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_pairs = data.read_at::<u16>(6)? as usize;
        let pairs = data.read_array(14..14 + num_pairs * KernPair::RAW_BYTE_LEN)?;
        Ok(Kern0 { data, pairs })
    }
}

impl<'a> Kern0<'a> {
    /// The number of kerning pairs in this subtable.
    pub fn num_pairs(&self) -> u16 {
        self.pairs.len() as u16
    }

    /// The largest power of two less than or equal to the value of
    /// num_pairs, multiplied by the size in bytes of an entry in the
    /// subtable.
    pub fn search_range(&self) -> u16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// This is calculated as log2 of the largest power of two less than or
    /// equal to the value of num_pairs.
    pub fn entry_selector(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// The value of num_pairs minus the largest power of two less than or
    /// equal to num_pairs.
    pub fn range_shift(&self) -> u16 {
        self.data.read_at(12).unwrap_or_default()
    }

    pub fn kerning_pairs(&self) -> &'a [KernPair] {
        self.pairs
    }

    /// Returns the value for the given pair, using a binary search over the
    /// sorted pairs.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let key = (left.to_u32() << 16) | right.to_u32();
        self.pairs
            .binary_search_by_key(&key, KernPair::key)
            .ok()
            .map(|ix| self.pairs[ix].value())
    }
}

/// A kerning pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct KernPair {
    /// The glyph index for the left-hand glyph in the kerning pair.
    pub left: BigEndian<GlyphId>,
    /// The glyph index for the right-hand glyph in the kerning pair.
    pub right: BigEndian<GlyphId>,
    /// The kerning value for the above pair, in design units.
    pub value: BigEndian<i16>,
}

impl FixedSize for KernPair {
    const RAW_BYTE_LEN: usize = 6;
}

impl KernPair {
    pub fn left(&self) -> GlyphId {
        self.left.get()
    }

    pub fn right(&self) -> GlyphId {
        self.right.get()
    }

    pub fn value(&self) -> i16 {
        self.value.get()
    }

    fn key(&self) -> u32 {
        (self.left().to_u32() << 16) | self.right().to_u32()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use skrift_test_data::{be_buffer, kern as test_data};

    use super::*;

    fn kern_pair(left: u16, right: u16, value: i16) -> KernPair {
        KernPair {
            left: GlyphId::new(left).into(),
            right: GlyphId::new(right).into(),
            value: value.into(),
        }
    }

    #[test]
    fn smoke_test() {
        let data = FontData::new(test_data::KERN_VER_0_FMT_0_DATA);
        let kern = Kern::read(data).unwrap();
        assert_eq!(kern.version(), 0);
        assert_eq!(kern.num_tables(), 1);

        let subtable = kern.subtables().next().unwrap().unwrap();
        assert_eq!(subtable.format(), 0);
        assert_eq!(subtable.length(), 32);
        assert_eq!(subtable.coverage(), KernCoverage::HORIZONTAL);
        assert!(subtable.is_horizontal_kerning());

        let kern0 = subtable.format0().unwrap().unwrap();
        assert_eq!(kern0.num_pairs(), 3);
        assert_eq!(kern0.search_range(), 12);
        assert_eq!(kern0.entry_selector(), 1);
        assert_eq!(kern0.range_shift(), 6);
        assert_eq!(
            kern0.kerning_pairs(),
            [
                kern_pair(4, 12, -40),
                kern_pair(4, 28, 40),
                kern_pair(5, 40, -50),
            ]
        );
        assert_eq!(kern0.kerning(GlyphId::new(4), GlyphId::new(28)), Some(40));
        assert_eq!(kern0.kerning(GlyphId::new(28), GlyphId::new(4)), None);
    }

    #[test]
    fn unsupported_version() {
        let buf = be_buffer!(1u16, 0u16);
        assert!(matches!(
            Kern::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(1))
        ));
    }

    #[test]
    fn walks_subtables_by_length() {
        let data = FontData::new(test_data::KERN_TWO_SUBTABLES);
        let kern = Kern::read(data).unwrap();
        let subtables = kern.subtables().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(subtables.len(), 2);
        // the first one holds minimum values and is not used for kerning
        assert!(!subtables[0].is_horizontal_kerning());
        assert!(subtables[1]
            .coverage()
            .contains(KernCoverage::HORIZONTAL | KernCoverage::CROSS_STREAM));
        let kern0 = subtables[1].format0().unwrap().unwrap();
        assert_eq!(kern0.kerning_pairs(), [kern_pair(1, 2, 30)]);
    }

    #[test]
    fn truncated_subtable_ends_iteration() {
        // claims two subtables but only holds part of one header
        let buf = be_buffer!(0u16, 2u16, 0u16, 20u16);
        let kern = Kern::read(FontData::new(&buf)).unwrap();
        let mut subtables = kern.subtables();
        assert!(matches!(
            subtables.next(),
            Some(Err(ReadError::OutOfBounds { .. }))
        ));
        assert!(subtables.next().is_none());
    }
}
