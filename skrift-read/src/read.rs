//! Traits for interpreting font data

use types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all font tables that are self-describing: that
/// is, tables that do not require any external state in order to interpret their
/// underlying bytes.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    ///
    /// In the case of a table, this method is responsible for ensuring the input
    /// data is consistent: this means ensuring that the fixed header is
    /// present and that any array lengths are not out-of-bounds.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read extended past the end of the available data.
    ///
    /// `offset` is the position of the read in the font file, `len` the
    /// number of bytes requested and `size` the end of the data that
    /// was being read from.
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },
    /// The file does not begin with a supported sfnt version.
    UnsupportedFormat([u8; 4]),
    /// A required table is not present in the font.
    MissingTable(Tag),
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidArrayLen,
    MetricIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::OutOfBounds { offset, len, size } => write!(
                f,
                "Read of {len} bytes at offset {offset} is out of bounds (size {size})"
            ),
            ReadError::UnsupportedFormat(magic) => {
                write!(f, "Unsupported font format (magic {})", Tag::new(magic))
            }
            ReadError::MissingTable(tag) => write!(f, "the {tag} table is missing"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::MetricIsMissing(tag) => write!(f, "the {tag} metric is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}
