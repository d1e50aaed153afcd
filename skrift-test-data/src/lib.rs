//! test data shared between the skrift crates.

pub mod bebuffer;
pub mod cmap;
mod font_builder;
pub mod kern;
pub mod test_font;

pub use font_builder::FontBuilder;
