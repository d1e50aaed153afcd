//! The font handle.

use std::collections::HashMap;
use std::sync::OnceLock;

use raw::{
    tables::{
        glyf::{Glyf, Glyph},
        hhea::Hhea,
        hmtx::Hmtx,
        loca::Loca,
    },
    FontRef, ReadError, TableProvider,
};

use crate::{
    charmap::Charmap,
    metrics::{self, Kerning},
    outline::DrawError,
    GlyphId,
};

/// Format of the offsets in the `loca` table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LocaFormat {
    /// 16-bit offsets, stored divided by two.
    Short,
    /// 32-bit offsets.
    Long,
}

/// A TrueType font prepared for rasterization.
///
/// Construction validates the file signature and reads the tables that are
/// needed for every glyph request: `head`, `hhea`, `loca`, `glyf` and `cmap`.
/// The `hmtx` and `kern` tables are optional.
///
/// The handle is immutable once built. The only lazily computed state is the
/// kerning map, which is built on first use and shared by all later calls,
/// including calls from other threads.
#[derive(Clone)]
pub struct Font<'a> {
    font: FontRef<'a>,
    units_per_em: u16,
    loca_format: LocaFormat,
    hhea: Hhea<'a>,
    hmtx: Option<Hmtx<'a>>,
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    charmap: Charmap<'a>,
    kerning: OnceLock<HashMap<(GlyphId, GlyphId), Kerning>>,
}

impl<'a> Font<'a> {
    /// Creates a new font from the given data.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Self::from_font_ref(FontRef::new(data)?)
    }

    /// Creates a new font from an existing font reference.
    pub fn from_font_ref(font: FontRef<'a>) -> Result<Self, ReadError> {
        let head = font.head()?;
        let units_per_em = head.units_per_em();
        if units_per_em == 0 {
            return Err(ReadError::MalformedData("units per em must be nonzero"));
        }
        let loca_format = match head.index_to_loc_format() {
            0 => LocaFormat::Short,
            _ => LocaFormat::Long,
        };
        let hhea = font.hhea()?;
        let loca = font.loca(loca_format == LocaFormat::Long)?;
        let glyf = font.glyf()?;
        let charmap = Charmap::from_cmap(&font.cmap()?);
        let hmtx = match font.hmtx(hhea.number_of_h_metrics()) {
            Ok(hmtx) => Some(hmtx),
            Err(ReadError::MissingTable(_)) => None,
            Err(e) => {
                log::warn!("ignoring malformed hmtx table: {e}");
                None
            }
        };
        Ok(Self {
            font,
            units_per_em,
            loca_format,
            hhea,
            hmtx,
            loca,
            glyf,
            charmap,
            kerning: OnceLock::new(),
        })
    }

    /// Returns the underlying font reference.
    pub fn font_ref(&self) -> &FontRef<'a> {
        &self.font
    }

    /// Number of font design units per em.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Offset width of the `loca` table, from `head`.
    pub fn loca_format(&self) -> LocaFormat {
        self.loca_format
    }

    /// Number of records in the long horizontal metrics block.
    pub fn num_long_hmtx(&self) -> u16 {
        self.hhea.number_of_h_metrics()
    }

    /// Number of glyphs addressable through the `loca` table.
    pub fn glyph_count(&self) -> usize {
        self.loca.len()
    }

    /// The horizontal header, read when the font was opened.
    pub fn hhea(&self) -> &Hhea<'a> {
        &self.hhea
    }

    /// The Unicode mapping selected from `cmap`.
    pub fn charmap(&self) -> &Charmap<'a> {
        &self.charmap
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Returns `None` if the font has no mapping for the codepoint.
    pub fn glyph_id(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        self.charmap.map(codepoint)
    }

    /// Returns the advance width and left side bearing of a glyph, in font
    /// units.
    ///
    /// Returns `None` if the font has no `hmtx` table or the table does not
    /// cover the glyph.
    pub fn hor_metrics(&self, glyph: GlyphId) -> Option<(u16, i16)> {
        self.hmtx.as_ref()?.metrics(glyph)
    }

    /// Returns the kerning adjustment for a pair of glyphs, in font units.
    ///
    /// The `kern` table is read in full on the first call. Returns `None`
    /// when the pair has no entry or the font has no usable `kern` table.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<Kerning> {
        self.kerning
            .get_or_init(|| metrics::kerning_pairs(&self.font))
            .get(&(left, right))
            .copied()
    }

    /// Returns the `glyf` entry for a glyph, or `None` if the glyph has no
    /// outline.
    pub fn glyph(&self, glyph: GlyphId) -> Result<Option<Glyph<'a>>, DrawError> {
        if glyph.to_u16() as usize >= self.loca.len() {
            return Err(DrawError::GlyphNotFound(glyph));
        }
        Ok(self.loca.get_glyf(glyph, &self.glyf)?)
    }
}

impl std::fmt::Debug for Font<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("units_per_em", &self.units_per_em)
            .field("loca_format", &self.loca_format)
            .field("num_long_hmtx", &self.num_long_hmtx())
            .field("glyph_count", &self.glyph_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use raw::types::Tag;
    use skrift_test_data::test_font::{self, glyphs};

    use super::*;

    #[test]
    fn reads_font_constants() {
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        assert_eq!(font.units_per_em(), test_font::UNITS_PER_EM);
        assert_eq!(font.loca_format(), LocaFormat::Short);
        assert_eq!(font.num_long_hmtx(), 3);
        assert_eq!(font.glyph_count(), glyphs::COUNT as usize);
        let data = test_font::build_with_long_loca();
        let font = Font::new(&data).unwrap();
        assert_eq!(font.loca_format(), LocaFormat::Long);
        assert_eq!(font.glyph_count(), glyphs::COUNT as usize);
    }

    #[test]
    fn required_tables() {
        for tag in [b"head", b"hhea", b"loca", b"glyf", b"cmap"] {
            let tag = Tag::new(tag);
            let data = test_font::builder().remove(tag).build();
            assert_eq!(
                Font::new(&data).err(),
                Some(ReadError::MissingTable(tag)),
                "{tag}"
            );
        }
    }

    #[test]
    fn optional_tables() {
        let data = test_font::builder()
            .remove(Tag::new(b"hmtx"))
            .remove(Tag::new(b"kern"))
            .build();
        let font = Font::new(&data).unwrap();
        assert_eq!(font.hor_metrics(glyphs::SQUARE), None);
        assert_eq!(font.kerning(glyphs::SQUARE, glyphs::ROUND), None);
    }

    #[test]
    fn rejects_unknown_signature() {
        let mut data = test_font::build();
        data[..4].copy_from_slice(b"wOF2");
        assert_eq!(
            Font::new(&data).err(),
            Some(ReadError::UnsupportedFormat(*b"wOF2"))
        );
    }

    #[test]
    fn rejects_zero_units_per_em() {
        let mut head = test_font::head(0).into_vec();
        // units per em lives at offset 18
        head[18..20].copy_from_slice(&[0, 0]);
        let data = test_font::builder()
            .add_raw(Tag::new(b"head"), head)
            .build();
        assert!(matches!(
            Font::new(&data),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn horizontal_metrics() {
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        assert_eq!(font.hor_metrics(glyphs::NOTDEF), Some((500, 0)));
        assert_eq!(font.hor_metrics(glyphs::SQUARE), Some((700, 100)));
        // past the long metrics the last advance is shared
        assert_eq!(font.hor_metrics(glyphs::COMPOUND), Some((1100, 100)));
        assert_eq!(font.hor_metrics(GlyphId::new(glyphs::COUNT)), None);
    }

    #[test]
    fn glyph_lookup() {
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        assert!(font.glyph(glyphs::NOTDEF).unwrap().is_none());
        assert!(matches!(
            font.glyph(glyphs::SQUARE),
            Ok(Some(Glyph::Simple(_)))
        ));
        assert!(matches!(
            font.glyph(glyphs::COMPOUND),
            Ok(Some(Glyph::Composite(_)))
        ));
        let past_end = GlyphId::new(glyphs::COUNT);
        assert!(matches!(
            font.glyph(past_end),
            Err(DrawError::GlyphNotFound(gid)) if gid == past_end
        ));
    }

    #[test]
    fn kerning_pairs_are_cached() {
        let data = test_font::build();
        let font = Font::new(&data).unwrap();
        let pair = font.kerning(glyphs::SQUARE, glyphs::ROUND).unwrap();
        assert_eq!(pair.x_shift, -50.0);
        assert_eq!(pair.y_shift, 0.0);
        // same map on the second call
        assert_eq!(font.kerning(glyphs::SQUARE, glyphs::ROUND), Some(pair));
        let cross = font.kerning(glyphs::ROUND, glyphs::SQUARE).unwrap();
        assert_eq!((cross.x_shift, cross.y_shift), (0.0, 10.0));
        // the minimum subtable is ignored
        assert_eq!(font.kerning(glyphs::ARCH, glyphs::SQUARE), None);
        // order matters
        assert_eq!(font.kerning(glyphs::ARCH, glyphs::ROUND), None);
    }
}
