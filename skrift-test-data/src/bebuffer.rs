//! small utilities for writing big-endian test data

use std::collections::HashMap;

use skrift_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position, so it can be overwritten
    /// later with [`BeBuffer::write_at`].
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes, such as a nested table built with another buffer.
    pub fn extend_from_slice(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    fn data_for(&mut self, tag: &str) -> &mut [u8] {
        let offset = self.offset_for(tag);
        &mut self.data[offset..]
    }

    /// Overwrite the scalar previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let data = self.data_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();

        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }

        for (left, right) in data.iter_mut().zip(new_data) {
            *left = *right
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for BeBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Build a [`BeBuffer`] from a comma separated list of scalars.
///
/// Arrays of scalars are written in `[brackets]`, and a value written as
/// `{value => "name"}` is tagged so that it can be overwritten later.
///
/// ```
/// # use skrift_test_data::be_buffer;
/// let buf = be_buffer! {
///     1u16,
///     [2u8, 3u8],
///     {4u32 => "count"}
/// };
/// assert_eq!(buf.as_slice(), &[0, 1, 2, 3, 0, 0, 0, 4]);
/// assert_eq!(buf.offset_for("count"), 4);
/// ```
#[macro_export]
macro_rules! be_buffer {
    ( $( $tokens:tt )* ) => {{
        #[allow(unused_mut)]
        let mut builder = $crate::bebuffer::BeBuffer::new();
        $crate::be_buffer_add!(builder; $( $tokens )*);
        builder
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! be_buffer_add {
    ($b:ident;) => {};
    ($b:ident; [$($v:expr),* $(,)?] $(, $($rest:tt)*)?) => {
        $b = $b.extend([$($v),*]);
        $crate::be_buffer_add!($b; $($($rest)*)?);
    };
    ($b:ident; {$v:expr => $tag:literal} $(, $($rest:tt)*)?) => {
        $b = $b.push_with_tag($v, $tag);
        $crate::be_buffer_add!($b; $($($rest)*)?);
    };
    ($b:ident; $v:expr $(, $($rest:tt)*)?) => {
        $b = $b.push($v);
        $crate::be_buffer_add!($b; $($($rest)*)?);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_big_endian() {
        let buf = be_buffer!(0x0102u16, -1i16, [7u8, 8u8], 0x0A0B0C0Du32);
        assert_eq!(
            buf.as_slice(),
            &[1, 2, 0xFF, 0xFF, 7, 8, 0x0A, 0x0B, 0x0C, 0x0D]
        );
    }

    #[test]
    fn tagged_write() {
        let mut buf = be_buffer!(1u16, {2u16 => "second"}, 3u16);
        assert_eq!(buf.offset_for("second"), 2);
        buf.write_at("second", 0xFFFFu16);
        assert_eq!(buf.as_slice(), &[0, 1, 0xFF, 0xFF, 0, 3]);
    }

    #[test]
    fn empty() {
        let buf = be_buffer!();
        assert!(buf.is_empty());
    }
}
