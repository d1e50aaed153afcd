//! Glyph and line metrics, and kerning adjustments.
//!
//! The values returned by [`Sft`](crate::Sft) are in device units: font
//! units multiplied by the configured scale over units per em. Kerning
//! pairs read directly from a [`Font`](crate::Font) are in font units.

use std::collections::HashMap;

use raw::{
    tables::kern::KernCoverage,
    FontRef, ReadError, TableProvider,
};

use crate::GlyphId;

/// Metrics for a single glyph at a particular scale.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetrics {
    /// Distance to move the pen after drawing the glyph.
    pub advance_width: f32,
    /// Distance from the pen position to the left edge of the glyph bitmap.
    pub left_side_bearing: f32,
    /// Vertical position of the bitmap origin relative to the baseline.
    ///
    /// With a downward Y axis this is the top edge of the bitmap, otherwise
    /// the bottom edge.
    pub y_offset: i32,
    /// Width of the smallest bitmap that holds the rendered glyph.
    pub min_width: i32,
    /// Height of the smallest bitmap that holds the rendered glyph.
    pub min_height: i32,
}

/// Metrics that apply to every line of text set in a font.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the line. Usually
    /// negative.
    pub descender: f32,
    /// Suggested extra spacing between lines.
    pub line_gap: f32,
}

/// Adjustment to the position of the second glyph in a pair.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kerning {
    /// Shift along the direction of the text.
    pub x_shift: f32,
    /// Shift perpendicular to the direction of the text.
    pub y_shift: f32,
}

/// Reads every usable pair from the `kern` table.
///
/// Only format 0 subtables with horizontal, non-minimum values contribute.
/// Values from several subtables for the same pair are summed.
pub(crate) fn kerning_pairs(font: &FontRef) -> HashMap<(GlyphId, GlyphId), Kerning> {
    let mut pairs = HashMap::new();
    let kern = match font.kern() {
        Ok(kern) => kern,
        Err(ReadError::MissingTable(_)) => return pairs,
        Err(e) => {
            log::warn!("ignoring unsupported kern table: {e}");
            return pairs;
        }
    };
    for (i, subtable) in kern.subtables().enumerate() {
        let subtable = match subtable {
            Ok(subtable) => subtable,
            Err(e) => {
                log::warn!("stopping at malformed kern subtable {i}: {e}");
                break;
            }
        };
        if !subtable.is_horizontal_kerning() {
            log::debug!("skipping kern subtable {i} with coverage {:?}", subtable.coverage());
            continue;
        }
        let kern0 = match subtable.format0() {
            Some(Ok(kern0)) => kern0,
            Some(Err(e)) => {
                log::warn!("skipping malformed kern subtable {i}: {e}");
                continue;
            }
            None => {
                log::debug!("skipping kern subtable {i} in format {}", subtable.format());
                continue;
            }
        };
        let cross_stream = subtable.coverage().contains(KernCoverage::CROSS_STREAM);
        for pair in kern0.kerning_pairs() {
            let entry: &mut Kerning = pairs.entry((pair.left(), pair.right())).or_default();
            let value = pair.value() as f32;
            if cross_stream {
                entry.y_shift += value;
            } else {
                entry.x_shift += value;
            }
        }
    }
    log::debug!("built kerning cache with {} pairs", pairs.len());
    pairs
}
