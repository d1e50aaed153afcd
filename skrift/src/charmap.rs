//! Mapping of characters (codepoints, not graphemes) to nominal glyph identifiers.
//!
//! The functionality in this module provides a 1-to-1 mapping from Unicode
//! characters to nominal or "default" internal glyph identifiers for a given
//! font. This is a necessary first step, but generally insufficient for
//! proper layout of complex text.

use raw::{
    tables::cmap::{Cmap, Cmap12, Cmap4, Cmap6, CmapSubtable, EncodingRecord},
    ReadError, TableProvider,
};

use crate::GlyphId;

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;

const ENCODING_UNICODE_BMP: u16 = 3;
const ENCODING_UNICODE_FULL: u16 = 4;
const ENCODING_MAC_ROMAN: u16 = 0;
const ENCODING_MS_UNICODE_CS: u16 = 1;
const ENCODING_MS_UCS_4: u16 = 10;

/// Mapping of characters to nominal glyph identifiers.
///
/// The mappings are derived from the [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
/// table.
///
/// ## Selection strategy
///
/// A single subtable is chosen when the map is created:
///
/// * The first encoding record for the full Unicode repertoire, (0, 4) or
///   (3, 10), is used if present. Only format 12 is supported for these; a
///   record in any other format leaves the map empty rather than falling
///   back to a BMP subtable.
/// * Otherwise the first record for the Basic Multilingual Plane, (0, 3),
///   (3, 1) or (1, 0), is used if it is in format 4 or 6.
#[derive(Clone, Default)]
pub struct Charmap<'a> {
    subtable: Option<SupportedSubtable<'a>>,
}

impl<'a> Charmap<'a> {
    /// Creates a new character map from the given font.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let Ok(cmap) = font.cmap() else {
            return Default::default();
        };
        Self::from_cmap(&cmap)
    }

    /// Creates a new character map from a parsed cmap table.
    pub fn from_cmap(cmap: &Cmap<'a>) -> Self {
        let records = cmap.encoding_records();
        let subtable = if let Some(record) = records.iter().find(|record| is_full_unicode(record)) {
            match record.subtable(cmap.offset_data()) {
                Ok(CmapSubtable::Format12(subtable)) => Some(SupportedSubtable::Format12(subtable)),
                other => reject_subtable(record, other),
            }
        } else if let Some(record) = records.iter().find(|record| is_unicode_bmp(record)) {
            match record.subtable(cmap.offset_data()) {
                Ok(CmapSubtable::Format4(subtable)) => Some(SupportedSubtable::Format4(subtable)),
                Ok(CmapSubtable::Format6(subtable)) => Some(SupportedSubtable::Format6(subtable)),
                other => reject_subtable(record, other),
            }
        } else {
            log::debug!("cmap has no Unicode encoding record");
            None
        };
        if let Some(subtable) = &subtable {
            log::debug!("selected cmap format {} subtable", subtable.format());
        }
        Self { subtable }
    }

    /// Returns true if a suitable Unicode character mapping is available.
    pub fn has_map(&self) -> bool {
        self.subtable.is_some()
    }

    /// Returns the format of the selected subtable.
    pub fn format(&self) -> Option<u16> {
        self.subtable.as_ref().map(SupportedSubtable::format)
    }

    /// Maps a character to a nominal glyph identifier.
    ///
    /// Returns `None` if a mapping does not exist.
    pub fn map(&self, ch: impl Into<u32>) -> Option<GlyphId> {
        self.subtable.as_ref()?.map(ch.into())
    }
}

fn is_full_unicode(record: &EncodingRecord) -> bool {
    matches!(
        (record.platform_id(), record.encoding_id()),
        (PLATFORM_UNICODE, ENCODING_UNICODE_FULL) | (PLATFORM_WINDOWS, ENCODING_MS_UCS_4)
    )
}

fn is_unicode_bmp(record: &EncodingRecord) -> bool {
    matches!(
        (record.platform_id(), record.encoding_id()),
        (PLATFORM_UNICODE, ENCODING_UNICODE_BMP)
            | (PLATFORM_WINDOWS, ENCODING_MS_UNICODE_CS)
            | (PLATFORM_MACINTOSH, ENCODING_MAC_ROMAN)
    )
}

fn reject_subtable<'a>(
    record: &EncodingRecord,
    subtable: Result<CmapSubtable<'a>, ReadError>,
) -> Option<SupportedSubtable<'a>> {
    let (platform, encoding) = (record.platform_id(), record.encoding_id());
    match subtable {
        Ok(subtable) => log::debug!(
            "cmap ({platform}, {encoding}) subtable has unsupported format {}",
            subtable.format()
        ),
        Err(ReadError::InvalidFormat(format)) => {
            log::debug!("cmap ({platform}, {encoding}) subtable has unknown format {format}")
        }
        Err(e) => log::warn!("failed to read cmap ({platform}, {encoding}) subtable: {e}"),
    }
    None
}

#[derive(Clone)]
enum SupportedSubtable<'a> {
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
}

impl SupportedSubtable<'_> {
    fn format(&self) -> u16 {
        match self {
            Self::Format4(_) => 4,
            Self::Format6(_) => 6,
            Self::Format12(_) => 12,
        }
    }

    fn map(&self, codepoint: u32) -> Option<GlyphId> {
        match self {
            Self::Format4(subtable) => subtable.map_codepoint(codepoint),
            Self::Format6(subtable) => subtable.map_codepoint(codepoint),
            Self::Format12(subtable) => subtable.map_codepoint(codepoint),
        }
    }
}
