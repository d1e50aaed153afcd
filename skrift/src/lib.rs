//! A small, memory safe TrueType glyph rasterizer.
//!
//! Skrift sits on top of the table parsing provided by
//! [`skrift-read`](raw) and turns glyphs into antialiased coverage bitmaps:
//!
//! * [`Font`] validates the table directory and holds the tables needed for
//!   rasterization along with the [`Charmap`](charmap::Charmap) and a lazily
//!   built kerning cache.
//! * [`Sft`] carries the scale, offset and orientation used to map font units
//!   to device pixels, and provides glyph lookup, metrics, kerning and
//!   [rendering](Sft::render).
//! * [`Outline`](outline::Outline) is the decoded, flattened form of a glyph
//!   that is handed to the rasterizer, and can also be drawn to any
//!   [`Pen`](raw::types::Pen).
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use skrift::{Font, Image, Sft};
//!
//! let data = std::fs::read(path_to_my_font_file).unwrap();
//! let font = Font::new(&data).unwrap();
//! let sft = Sft::new(&font).with_scale(24.0, 24.0);
//! let glyph = sft.lookup('g').unwrap();
//! let metrics = sft.glyph_metrics(glyph).unwrap();
//! let mut image = Image::new(metrics.min_width as u32, metrics.min_height as u32);
//! sft.render(glyph, &mut image).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Expose our "raw" underlying parser crate.
pub extern crate skrift_read as raw;

pub mod charmap;
pub mod metrics;
pub mod outline;

mod font;
mod image;
mod raster;
mod sft;
mod transform;

pub use font::{Font, LocaFormat};
pub use image::Image;
pub use outline::DrawError;
pub use sft::{Sft, SftFlags};
pub use transform::Transform;

/// Type for a glyph identifier.
pub type GlyphId = raw::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables and other resources.
pub type Tag = raw::types::Tag;

#[cfg(test)]
mod testing;
