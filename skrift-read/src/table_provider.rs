//! a trait for things that can serve font tables

use types::Tag;

use crate::{tables, FontData, FontRead, ReadError};

/// A table that has an associated tag.
///
/// This is true of top-level tables, but not their various subtables.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::MissingTable(tag))
    }

    fn expect_table<T: TopLevelTable + FontRead<'a>>(&self) -> Result<T, ReadError> {
        self.expect_data_for_tag(T::TAG).and_then(FontRead::read)
    }

    fn head(&self) -> Result<tables::head::Head<'a>, ReadError> {
        self.expect_table()
    }

    fn hhea(&self) -> Result<tables::hhea::Hhea<'a>, ReadError> {
        self.expect_table()
    }

    /// The number of long metrics can be optionally provided, if known,
    /// otherwise we look it up in hhea.
    fn hmtx(
        &self,
        number_of_h_metrics: impl Into<Option<u16>>,
    ) -> Result<tables::hmtx::Hmtx<'a>, ReadError> {
        let number_of_h_metrics = match number_of_h_metrics.into() {
            Some(val) => val,
            None => self.hhea()?.number_of_h_metrics(),
        };
        self.expect_data_for_tag(tables::hmtx::Hmtx::TAG)
            .and_then(|data| tables::hmtx::Hmtx::read(data, number_of_h_metrics))
    }

    /// is_long can be optionally provided, if known, otherwise we look it up in head.
    fn loca(&self, is_long: impl Into<Option<bool>>) -> Result<tables::loca::Loca<'a>, ReadError> {
        let is_long = match is_long.into() {
            Some(val) => val,
            None => self.head()?.index_to_loc_format() != 0,
        };
        self.expect_data_for_tag(tables::loca::Loca::TAG)
            .and_then(|data| tables::loca::Loca::read(data, is_long))
    }

    fn glyf(&self) -> Result<tables::glyf::Glyf<'a>, ReadError> {
        self.expect_table()
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap<'a>, ReadError> {
        self.expect_table()
    }

    fn kern(&self) -> Result<tables::kern::Kern<'a>, ReadError> {
        self.expect_table()
    }
}
