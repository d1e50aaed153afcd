//! Error types associated with outlines.

use core::fmt;

use raw::types::BoundingBox;

pub use raw::ReadError;

use crate::GlyphId;

/// Errors that may occur when decoding or rendering glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawError {
    /// Error occurred when reading font data.
    Read(ReadError),
    /// The requested glyph was not present in the font.
    GlyphNotFound(GlyphId),
    /// The bounding box in the glyph header has no area.
    BrokenBoundingBox(GlyphId, BoundingBox<i16>),
    /// Contour end points of a simple glyph were not strictly increasing.
    MalformedContour {
        /// The glyph containing the bad contour.
        glyph: GlyphId,
        /// Index of the first contour whose end point is out of order.
        contour: usize,
    },
    /// Exceeded a recursion limit when loading a glyph.
    RecursionLimitExceeded(GlyphId),
    /// A composite glyph positions a component by matching points, which
    /// is not supported.
    UnsupportedComposition(GlyphId),
    /// The image buffer length does not equal width times height.
    ImageSizeMismatch {
        /// Width times height of the image.
        expected: usize,
        /// Actual length of the pixel buffer.
        found: usize,
    },
}

impl From<ReadError> for DrawError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "{e}"),
            Self::GlyphNotFound(gid) => write!(f, "Glyph {gid} was not found in the given font"),
            Self::BrokenBoundingBox(gid, bbox) => write!(
                f,
                "Glyph {gid} has a degenerate bounding box ({}, {}, {}, {})",
                bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
            ),
            Self::MalformedContour { glyph, contour } => write!(
                f,
                "End point of contour {contour} in glyph {glyph} does not follow the previous contour"
            ),
            Self::RecursionLimitExceeded(gid) => write!(
                f,
                "Recursion limit ({}) exceeded when loading composite component {gid}",
                super::GLYF_COMPOSITE_RECURSION_LIMIT,
            ),
            Self::UnsupportedComposition(gid) => write!(
                f,
                "Composite glyph {gid} positions a component by point matching"
            ),
            Self::ImageSizeMismatch { expected, found } => write!(
                f,
                "Image buffer holds {found} pixels, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}
