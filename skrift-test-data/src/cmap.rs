//! cmap tables and subtables

use crate::{be_buffer, bebuffer::BeBuffer};

/// A format 4 subtable with four segments:
///
/// * `0x20..=0x22` maps to glyphs 1..=3 through the delta
/// * `0x41..=0x43` maps to glyphs 10..=12 through the delta
/// * `0x61..=0x63` reads `[20, 21, 0]` from the glyph id array
/// * `0xFFFF` wraps to glyph 0 through the delta, so it is unmapped
pub fn simple_cmap4() -> BeBuffer {
    be_buffer! {
        4u16,                       // format
        54u16,                      // length
        0u16,                       // language
        {8u16 => "seg_count_x2"},
        8u16,                       // search range
        2u16,                       // entry selector
        0u16,                       // range shift
        [0x22u16, 0x43, 0x63, 0xFFFF],  // end codes
        0u16,                       // reserved pad
        [0x20u16, 0x41, 0x61, 0xFFFF],  // start codes
        [-0x1Fi16, -55, 0, 1],      // id deltas
        [0u16, 0, 4, 0],            // id range offsets
        [20u16, 21, 0]              // glyph id array
    }
}

/// A format 4 subtable whose delta overflows past 0xFFFF.
pub fn wrapping_cmap4() -> BeBuffer {
    be_buffer! {
        4u16, 32u16, 0u16,
        {4u16 => "seg_count_x2"},
        4u16, 1u16, 0u16,
        [0xFFF1u16, 0xFFFF],
        0u16,
        [0xFFF0u16, 0xFFFF],
        [0x20i16, 1],
        [0u16, 0]
    }
}

/// Build a format 4 subtable with one delta segment per `(codepoint, glyph)`
/// pair, followed by the required `0xFFFF` segment.
///
/// The pairs must be sorted by codepoint.
pub fn cmap4_from_pairs(pairs: &[(u16, u16)]) -> BeBuffer {
    let seg_count = pairs.len() as u16 + 1;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 * (1u16 << entry_selector);
    let ends = pairs.iter().map(|(cp, _)| *cp).chain([0xFFFF]);
    let deltas = pairs
        .iter()
        .map(|(cp, gid)| gid.wrapping_sub(*cp) as i16)
        .chain([1]);
    BeBuffer::new()
        .push(4u16)
        .push(16 + 8 * seg_count)
        .push(0u16)
        .push(seg_count * 2)
        .push(search_range)
        .push(entry_selector)
        .push(seg_count * 2 - search_range)
        .extend(ends.clone())
        .push(0u16)
        .extend(ends)
        .extend(deltas)
        .extend(std::iter::repeat(0u16).take(seg_count as usize))
}

/// A format 6 subtable mapping `0x41..=0x43` to glyphs 7..=9.
pub fn simple_cmap6() -> BeBuffer {
    be_buffer! {
        6u16,       // format
        16u16,      // length
        0u16,       // language
        0x41u16,    // first code
        3u16,       // entry count
        [7u16, 8, 9]
    }
}

/// A format 12 subtable with three groups; the last overlaps the first.
pub fn simple_cmap12() -> BeBuffer {
    be_buffer! {
        12u16,      // format
        0u16,       // reserved
        52u32,      // length
        0u32,       // language
        {3u32 => "num_groups"},
        0x41u32, 0x43u32, 1u32,
        0x1F600u32, 0x1F64Fu32, 30u32,
        0x40u32, 0x42u32, 50u32
    }
}

/// A format 13 subtable mapping ASCII to glyph 1 and the last Unicode
/// codepoint to glyph 2.
pub fn simple_cmap13() -> BeBuffer {
    be_buffer! {
        13u16, 0u16, 40u32, 0u32,
        {2u32 => "num_groups"},
        0u32, 0x7Fu32, 1u32,
        0x10FFFFu32, 0x10FFFFu32, 2u32
    }
}

/// Wrap subtables in a cmap header with one encoding record each.
///
/// Each entry is a `(platform_id, encoding_id, subtable)` triple; subtables
/// are laid out in order after the records.
pub fn cmap_with_subtables(subtables: &[(u16, u16, &[u8])]) -> BeBuffer {
    let mut buf = BeBuffer::new().push(0u16).push(subtables.len() as u16);
    let mut offset = 4 + 8 * subtables.len() as u32;
    for (platform_id, encoding_id, data) in subtables {
        buf = buf.push(*platform_id).push(*encoding_id).push(offset);
        offset += data.len() as u32;
    }
    for (_, _, data) in subtables {
        buf = buf.extend_from_slice(data);
    }
    buf
}
