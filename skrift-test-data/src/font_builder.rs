//! A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;

use skrift_types::{Tag, TT_SFNT_VERSION};

use crate::bebuffer::BeBuffer;

const TABLE_RECORD_LEN: usize = 16;

/// Build a font from some set of raw tables.
#[derive(Debug, Clone, Default)]
pub struct FontBuilder<'a> {
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Remove the table with the provided tag, if present.
    pub fn remove(&mut self, tag: Tag) -> &mut Self {
        self.tables.remove(&tag);
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&mut self) -> Vec<u8> {
        let header_len = std::mem::size_of::<u32>() // sfnt
            + std::mem::size_of::<u16>() * 4 // num_tables to range_shift
            + self.tables.len() * TABLE_RECORD_LEN;

        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = search_range(num_tables);
        let mut directory = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);

        let mut position = header_len as u32;
        for (tag, data) in &self.tables {
            let (checksum, padding) = checksum_and_padding(data);
            directory = directory
                .push(*tag)
                .push(checksum)
                .push(position)
                .push(data.len() as u32);
            position += data.len() as u32 + padding;
        }

        let mut data = directory.into_vec();
        for table in self.tables.values() {
            data.extend_from_slice(table);
            let rem = round4(table.len()) - table.len();
            let padding = [0u8; 4];
            data.extend_from_slice(&padding[..rem]);
        }
        data
    }
}

fn search_range(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * TABLE_RECORD_LEN as u16;
    let range_shift = num_tables * TABLE_RECORD_LEN as u16 - search_range;
    (search_range, entry_selector, range_shift)
}

fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

fn checksum_and_padding(table: &[u8]) -> (u32, u32) {
    let checksum = table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    });
    let padding = round4(table.len()) - table.len();
    (checksum, padding as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_binary_search_assists() {
        // Based on Roboto's num tables
        assert_eq!(search_range(0x16), (256, 4, 96));
        assert_eq!(search_range(1), (16, 0, 0));
    }

    #[test]
    fn survives_no_tables() {
        let data = FontBuilder::default().build();
        assert_eq!(data.len(), 12);
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let pad = checksum_and_padding(&vec![0; i]).1;
            assert!(pad < 4);
            assert!((i + pad as usize) % 4 == 0, "pad {i} +{pad} bytes");
        }
    }

    #[test]
    fn tables_are_sorted_and_aligned() {
        let data = FontBuilder::new()
            .add_raw(Tag::new(b"zzzz"), vec![1, 2, 3])
            .add_raw(Tag::new(b"aaaa"), vec![4, 5, 6, 7, 8])
            .build();
        // directory is 12 + 2 * 16 bytes, then 'aaaa' padded to 8 bytes
        assert_eq!(&data[12..16], b"aaaa");
        assert_eq!(&data[20..24], &44u32.to_be_bytes());
        assert_eq!(&data[28..32], b"zzzz");
        assert_eq!(&data[36..40], &52u32.to_be_bytes());
        assert_eq!(&data[44..49], &[4, 5, 6, 7, 8]);
        assert_eq!(&data[52..55], &[1, 2, 3]);
        assert_eq!(data.len(), 56);
    }

    #[test]
    fn checksum_sums_padded_words() {
        let (sum, _) = checksum_and_padding(&[0, 0, 0, 1, 0, 0, 0, 2, 1]);
        assert_eq!(sum, 3 + 0x0100_0000);
    }
}
