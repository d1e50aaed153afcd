//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::{BigEndian, FixedSize, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
#[derive(Clone)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    encoding_records: &'a [EncodingRecord],
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_tables = data.read_at::<u16>(2)? as usize;
        let encoding_records =
            data.read_array(4..4 + num_tables * EncodingRecord::RAW_BYTE_LEN)?;
        Ok(Cmap {
            data,
            encoding_records,
        })
    }
}

impl<'a> Cmap<'a> {
    /// Table version number (0).
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    /// Number of encoding tables that follow.
    pub fn num_tables(&self) -> u16 {
        self.encoding_records.len() as u16
    }

    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// The data that encoding record offsets are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

/// A platform/encoding pair and the offset of its subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct EncodingRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    pub subtable_offset: BigEndian<u32>,
}

impl FixedSize for EncodingRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl EncodingRecord {
    /// Platform ID.
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    /// Platform-specific encoding ID.
    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// Byte offset from beginning of the cmap table to the subtable for
    /// this encoding.
    pub fn subtable_offset(&self) -> u32 {
        self.subtable_offset.get()
    }

    /// Resolve the subtable, given the data of the parent cmap table.
    pub fn subtable<'a>(&self, cmap_data: FontData<'a>) -> Result<CmapSubtable<'a>, ReadError> {
        cmap_data.read_ref_at(self.subtable_offset() as usize)
    }
}

/// The cmap subtable formats used for glyph lookup.
#[derive(Clone)]
pub enum CmapSubtable<'a> {
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
    Format13(Cmap13<'a>),
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        match format {
            4 => Cmap4::read(data).map(Self::Format4),
            6 => Cmap6::read(data).map(Self::Format6),
            12 => Cmap12::read(data).map(Self::Format12),
            13 => Cmap13::read(data).map(Self::Format13),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl CmapSubtable<'_> {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format4(_) => 4,
            Self::Format6(_) => 6,
            Self::Format12(_) => 12,
            Self::Format13(_) => 13,
        }
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        match self {
            Self::Format4(subtable) => subtable.map_codepoint(codepoint),
            Self::Format6(subtable) => subtable.map_codepoint(codepoint),
            Self::Format12(subtable) => subtable.map_codepoint(codepoint),
            Self::Format13(subtable) => subtable.map_codepoint(codepoint),
        }
    }
}

/// [cmap Format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values): Segment mapping to delta values
#[derive(Clone)]
pub struct Cmap4<'a> {
    data: FontData<'a>,
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    id_range_offsets_start: usize,
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let seg_count_x2 = data.read_at::<u16>(6)? as usize;
        if seg_count_x2 == 0 || seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("cmap4 segCountX2 must be even and nonzero"));
        }
        let end_code_start = 14;
        // a reserved pad follows the end codes
        let start_code_start = end_code_start + seg_count_x2 + 2;
        let id_delta_start = start_code_start + seg_count_x2;
        let id_range_offsets_start = id_delta_start + seg_count_x2;
        Ok(Cmap4 {
            data,
            end_code: data.read_array(end_code_start..end_code_start + seg_count_x2)?,
            start_code: data.read_array(start_code_start..id_delta_start)?,
            id_delta: data.read_array(id_delta_start..id_range_offsets_start)?,
            id_range_offsets: data
                .read_array(id_range_offsets_start..id_range_offsets_start + seg_count_x2)?,
            id_range_offsets_start,
        })
    }
}

impl<'a> Cmap4<'a> {
    /// 2 × segCount.
    pub fn seg_count_x2(&self) -> u16 {
        (self.end_code.len() * 2) as u16
    }

    /// End characterCode for each segment, last=0xFFFF.
    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    /// Start character code for each segment.
    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    /// Delta for all character codes in segment.
    pub fn id_delta(&self) -> &'a [BigEndian<i16>] {
        self.id_delta
    }

    /// Offsets into glyphIdArray or 0
    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// The segment is the first one whose end code is not less than the
    /// codepoint, so the end codes must be sorted. Glyph ids computed from
    /// the delta wrap around modulo 65536. A result of glyph 0 is unmapped,
    /// whether it comes from the delta or from the glyph id array.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint: u16 = codepoint.into().try_into().ok()?;
        let index = self.end_code.partition_point(|end| end.get() < codepoint);
        self.end_code.get(index)?;
        let start_code = self.start_code.get(index)?.get();
        if codepoint < start_code {
            return None;
        }
        let delta = self.id_delta.get(index)?.get() as u16;
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return mapped(codepoint.wrapping_add(delta));
        }
        // the range offset is relative to its own position in the array
        let offset = self.id_range_offsets_start
            + index * 2
            + range_offset
            + (codepoint - start_code) as usize * 2;
        let gid = self.data.read_at::<u16>(offset).ok()?;
        if gid == 0 {
            return None;
        }
        mapped(gid.wrapping_add(delta))
    }
}

/// Glyph 0 is the missing glyph; every format reports it as unmapped.
fn mapped(gid: u16) -> Option<GlyphId> {
    (gid != 0).then_some(GlyphId::new(gid))
}

/// [cmap Format 6](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping): Trimmed table mapping
#[derive(Clone)]
pub struct Cmap6<'a> {
    first_code: u16,
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap6<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let first_code = data.read_at::<u16>(6)?;
        let entry_count = data.read_at::<u16>(8)? as usize;
        let glyph_id_array = data.read_array(10..10 + entry_count * 2)?;
        Ok(Cmap6 {
            first_code,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap6<'a> {
    /// First character code of subrange.
    pub fn first_code(&self) -> u16 {
        self.first_code
    }

    /// Number of character codes in subrange.
    pub fn entry_count(&self) -> u16 {
        self.glyph_id_array.len() as u16
    }

    /// Array of glyph index values for character codes in the range.
    pub fn glyph_id_array(&self) -> &'a [BigEndian<u16>] {
        self.glyph_id_array
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint: u16 = codepoint.into().try_into().ok()?;
        let index = codepoint.checked_sub(self.first_code)? as usize;
        mapped(self.glyph_id_array.get(index)?.get())
    }
}

/// A group of consecutive character codes, shared by formats 12 and 13.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct MapGroup {
    /// First character code in this group
    pub start_char_code: BigEndian<u32>,
    /// Last character code in this group
    pub end_char_code: BigEndian<u32>,
    /// For format 12, the glyph index of the starting character code; for
    /// format 13, the glyph index used for every code in the group.
    pub glyph_id: BigEndian<u32>,
}

impl FixedSize for MapGroup {
    const RAW_BYTE_LEN: usize = 12;
}

impl MapGroup {
    pub fn start_char_code(&self) -> u32 {
        self.start_char_code.get()
    }

    pub fn end_char_code(&self) -> u32 {
        self.end_char_code.get()
    }

    pub fn glyph_id(&self) -> u32 {
        self.glyph_id.get()
    }

    fn contains(&self, codepoint: u32) -> bool {
        (self.start_char_code()..=self.end_char_code()).contains(&codepoint)
    }
}

fn read_groups<'a>(data: FontData<'a>) -> Result<&'a [MapGroup], ReadError> {
    let num_groups = data.read_at::<u32>(12)? as usize;
    let len = num_groups
        .checked_mul(MapGroup::RAW_BYTE_LEN)
        .and_then(|len| len.checked_add(16))
        .ok_or_else(|| data.out_of_bounds(16, usize::MAX))?;
    data.read_array(16..len)
}

/// [cmap Format 12](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage): Segmented coverage
#[derive(Clone)]
pub struct Cmap12<'a> {
    groups: &'a [MapGroup],
}

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        read_groups(data).map(|groups| Cmap12 { groups })
    }
}

impl<'a> Cmap12<'a> {
    pub fn groups(&self) -> &'a [MapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Groups are scanned in order and the first group containing the
    /// codepoint is used.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let group = self.groups.iter().find(|group| group.contains(codepoint))?;
        let gid = group
            .glyph_id()
            .checked_add(codepoint - group.start_char_code())?;
        mapped(u16::try_from(gid).ok()?)
    }
}

/// [cmap Format 13](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings): Many-to-one range mappings
#[derive(Clone)]
pub struct Cmap13<'a> {
    groups: &'a [MapGroup],
}

impl<'a> FontRead<'a> for Cmap13<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        read_groups(data).map(|groups| Cmap13 { groups })
    }
}

impl<'a> Cmap13<'a> {
    pub fn groups(&self) -> &'a [MapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Every codepoint in a group maps to the same glyph.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let group = self.groups.iter().find(|group| group.contains(codepoint))?;
        mapped(u16::try_from(group.glyph_id()).ok()?)
    }
}
