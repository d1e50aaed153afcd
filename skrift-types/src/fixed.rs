//! fixed-point numerical types

/// A signed 2.14 fixed-point number.
///
/// Used for the scale factors of composite glyph components.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct F2Dot14(i16);

impl F2Dot14 {
    const FRACT_BITS: u32 = 14;
    const ONE_BITS: i32 = 1 << Self::FRACT_BITS;

    /// Minimum value.
    pub const MIN: Self = Self(i16::MIN);
    /// Maximum value.
    pub const MAX: Self = Self(i16::MAX);
    /// Representation of 0.0.
    pub const ZERO: Self = Self(0);
    /// Representation of 1.0.
    pub const ONE: Self = Self(Self::ONE_BITS as i16);

    /// Creates a new value from the raw bits.
    pub const fn from_bits(bits: i16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn to_bits(self) -> i16 {
        self.0
    }

    /// Creates a value from a 32-bit float, saturating at the bounds.
    pub fn from_f32(x: f32) -> Self {
        let bits = (x * Self::ONE_BITS as f32) as i32;
        Self(bits.clamp(i16::MIN as i32, i16::MAX as i32) as i16)
    }

    /// Returns the value as a 32-bit float.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE_BITS as f32
    }
}

impl std::fmt::Debug for F2Dot14 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl std::fmt::Display for F2Dot14 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

crate::newtype_scalar!(F2Dot14, [u8; 2]);
