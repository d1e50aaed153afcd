//! Reading the TrueType tables needed to rasterize glyphs
//!
//! This crate provides memory safe zero-allocation parsing of font files.
//! It gives raw, bounds-checked access to the handful of tables used by a
//! TrueType glyph rasterizer: the [table directory], `head`, `hhea`, `hmtx`,
//! `loca`, `glyf`, `cmap` and `kern`.
//!
//! In addition to raw data access, this crate provides the reference
//! algorithms needed for the data to be useful, such as
//! [mapping codepoints to glyph identifiers][cmap-impl] or
//! [decoding glyph points][points].
//!
//! For rendering glyphs to bitmaps, see the `skrift` crate.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use skrift_read::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! println!("{} units per em", head.units_per_em());
//! ```
//!
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
//! [cmap-impl]: tables::cmap::CmapSubtable::map_codepoint
//! [points]: tables::glyf::SimpleGlyph::read_points

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod font_data;
mod read;
mod table_provider;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError};
pub use table_provider::{TableProvider, TopLevelTable};

/// Public re-export of the skrift-types crate.
pub extern crate skrift_types as types;

use types::{BigEndian, FixedSize, Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

const TABLE_RECORD_START: usize = 12;

/// A record in the [table directory](TableDirectory).
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: BigEndian<Tag>,
    /// Checksum for the table.
    pub checksum: BigEndian<u32>,
    /// Offset from the beginning of the font data.
    pub offset: BigEndian<u32>,
    /// Length of the table.
    pub length: BigEndian<u32>,
}

impl FixedSize for TableRecord {
    const RAW_BYTE_LEN: usize = 16;
}

impl TableRecord {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    pub fn length(&self) -> u32 {
        self.length.get()
    }
}

/// The [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
/// at the start of a font file.
#[derive(Clone)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    table_records: &'a [TableRecord],
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let sfnt_version = data.read_at::<u32>(0)?;
        let num_tables = data.read_at::<u16>(4)? as usize;
        let end = TABLE_RECORD_START + num_tables * TableRecord::RAW_BYTE_LEN;
        let table_records = data.read_array(TABLE_RECORD_START..end)?;
        Ok(TableDirectory {
            sfnt_version,
            table_records,
        })
    }
}

impl<'a> TableDirectory<'a> {
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    pub fn table_records(&self) -> &'a [TableRecord] {
        self.table_records
    }

    /// Returns the record for the given tag.
    ///
    /// If the directory lists a tag more than once, the last entry wins.
    pub fn find(&self, tag: Tag) -> Option<&'a TableRecord> {
        self.table_records.iter().rev().find(|rec| rec.tag() == tag)
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must begin with a [table directory] whose version is one of
    /// the TrueType (`00 01 00 00`), Apple TrueType (`true`) or CFF (`OTTO`)
    /// signatures; anything else fails with [`ReadError::UnsupportedFormat`].
    ///
    /// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let magic = data.read_at::<u32>(0)?;
        if ![TT_SFNT_VERSION, TRUE_SFNT_VERSION, CFF_SFNT_VERSION].contains(&magic) {
            return Err(ReadError::UnsupportedFormat(magic.to_be_bytes()));
        }
        Ok(FontRef {
            data,
            table_directory: TableDirectory::read(data)?,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the absolute offset of the table with the given tag, if present.
    pub fn table_offset(&self, tag: Tag) -> Option<usize> {
        self.table_directory
            .find(tag)
            .map(|record| record.offset() as usize)
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// A table whose directory entry points outside of the font data is
    /// treated as absent.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_directory.find(tag).and_then(|record| {
            let start = record.offset() as usize;
            let len = record.length() as usize;
            self.data.slice(start..start.checked_add(len)?)
        })
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use skrift_test_data::{be_buffer, bebuffer::BeBuffer, FontBuilder};
    use types::Tag;

    use super::*;

    fn directory_with(magic: u32, records: &[(&[u8; 4], u32, u32)]) -> BeBuffer {
        let mut buf = be_buffer! {
            magic,
            (records.len() as u16),
            0u16, 0u16, 0u16
        };
        for (tag, offset, length) in records {
            buf = buf
                .push(Tag::new(tag))
                .push(0u32)
                .push(*offset)
                .push(*length);
        }
        buf
    }

    #[test]
    fn accepts_all_sfnt_signatures() {
        for magic in [TT_SFNT_VERSION, TRUE_SFNT_VERSION, CFF_SFNT_VERSION] {
            let buf = directory_with(magic, &[]);
            assert!(FontRef::new(&buf).is_ok(), "{magic:08X}");
        }
    }

    #[test]
    fn rejects_unknown_signature() {
        let buf = directory_with(u32::from_be_bytes(*b"wOFF"), &[]);
        assert_eq!(
            FontRef::new(&buf).err(),
            Some(ReadError::UnsupportedFormat(*b"wOFF"))
        );
    }

    #[test]
    fn truncated_header_is_out_of_bounds() {
        assert!(matches!(
            FontRef::new(&[0, 1]),
            Err(ReadError::OutOfBounds { offset: 0, .. })
        ));
        // valid magic but the records are missing
        let buf = be_buffer!(TT_SFNT_VERSION, 2u16, 0u16, 0u16, 0u16);
        assert!(matches!(
            FontRef::new(&buf),
            Err(ReadError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn last_duplicate_tag_wins() {
        let mut buf = directory_with(
            TT_SFNT_VERSION,
            &[(b"abcd", 60, 2), (b"wxyz", 62, 2), (b"abcd", 64, 2)],
        );
        assert_eq!(buf.len(), 12 + 3 * 16);
        // pad the table data out
        buf = buf.extend([0xAAAAu16, 0xBBBB, 0xCCCC, 0xDDDD]);
        let font = FontRef::new(&buf).unwrap();
        assert_eq!(font.table_offset(Tag::new(b"abcd")), Some(64));
        assert_eq!(
            font.table_data(Tag::new(b"abcd")).unwrap().read_at::<u16>(0),
            Ok(0xCCCC)
        );
        assert_eq!(font.table_offset(Tag::new(b"none")), None);
        assert_eq!(
            font.expect_data_for_tag(Tag::new(b"none")).err(),
            Some(ReadError::MissingTable(Tag::new(b"none")))
        );
    }

    #[test]
    fn table_outside_of_file_is_absent() {
        let buf = directory_with(TT_SFNT_VERSION, &[(b"head", 28, 1000)]);
        let font = FontRef::new(&buf).unwrap();
        assert_eq!(font.table_offset(Tag::new(b"head")), Some(28));
        assert!(font.table_data(Tag::new(b"head")).is_none());
        assert!(matches!(font.head(), Err(ReadError::MissingTable(_))));
    }

    #[test]
    fn builder_output_is_readable() {
        let font_data = FontBuilder::new()
            .add_raw(Tag::new(b"abcd"), vec![1, 2, 3])
            .add_raw(Tag::new(b"efgh"), vec![4, 5])
            .build();
        let font = FontRef::new(&font_data).unwrap();
        assert_eq!(font.table_directory.num_tables(), 2);
        assert_eq!(
            font.table_data(Tag::new(b"efgh")).unwrap().as_bytes(),
            &[4, 5]
        );
    }
}
