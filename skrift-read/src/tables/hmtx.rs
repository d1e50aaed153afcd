//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{BigEndian, FixedSize, GlyphId, Tag};

use crate::{FontData, ReadError, TopLevelTable};

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table.
///
/// Glyphs covered by the long metrics block have their own advance width;
/// the remaining glyphs share the advance of the last long record and store
/// only a left side bearing.
#[derive(Clone)]
pub struct Hmtx<'a> {
    h_metrics: &'a [LongMetric],
    left_side_bearings: &'a [BigEndian<i16>],
}

/// A record of an advance width and left side bearing.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct LongMetric {
    /// Advance width, in font design units.
    pub advance: BigEndian<u16>,
    /// Glyph left side bearing, in font design units.
    pub side_bearing: BigEndian<i16>,
}

impl LongMetric {
    pub fn advance(&self) -> u16 {
        self.advance.get()
    }

    pub fn side_bearing(&self) -> i16 {
        self.side_bearing.get()
    }
}

impl FixedSize for LongMetric {
    const RAW_BYTE_LEN: usize = 4;
}

impl TopLevelTable for Hmtx<'_> {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl<'a> Hmtx<'a> {
    /// Read the table, given the `numberOfHMetrics` field from `hhea`.
    ///
    /// Every byte after the long metrics block is treated as part of the
    /// left side bearing array.
    pub fn read(data: FontData<'a>, number_of_h_metrics: u16) -> Result<Self, ReadError> {
        let long_len = number_of_h_metrics as usize * LongMetric::RAW_BYTE_LEN;
        let h_metrics = data.read_array(0..long_len)?;
        let short_len = data.len().saturating_sub(long_len) & !1;
        let left_side_bearings = data.read_array(long_len..long_len + short_len)?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }

    pub fn h_metrics(&self) -> &'a [LongMetric] {
        self.h_metrics
    }

    pub fn left_side_bearings(&self) -> &'a [BigEndian<i16>] {
        self.left_side_bearings
    }

    /// Returns the advance width and left side bearing for the given glyph.
    ///
    /// Returns `None` when the glyph is past the long metrics block and
    /// either there is no long record to take the advance from or the
    /// short bearing array does not reach this glyph.
    pub fn metrics(&self, glyph_id: GlyphId) -> Option<(u16, i16)> {
        let ix = glyph_id.to_u16() as usize;
        if let Some(metric) = self.h_metrics.get(ix) {
            return Some((metric.advance(), metric.side_bearing()));
        }
        let advance = self.h_metrics.last()?.advance();
        let lsb = self
            .left_side_bearings
            .get(ix - self.h_metrics.len())?
            .get();
        Some((advance, lsb))
    }
}
