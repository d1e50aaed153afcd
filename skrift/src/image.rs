/// An 8-bit grayscale coverage bitmap.
///
/// Pixels are stored row by row with no padding, so `pixels` holds exactly
/// `width * height` bytes. Zero is uncovered and 255 is fully covered.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Creates a blank image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Returns the coverage at the given position, if it lies inside the
    /// image.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterates over the rows of the image.
    pub fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.pixels.chunks(self.width.max(1) as usize)
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_blank() {
        let image = Image::new(3, 2);
        assert_eq!(image.pixels, [0; 6]);
        assert_eq!(image.rows().count(), 2);
        assert_eq!(image.get(2, 1), Some(0));
        assert_eq!(image.get(3, 0), None);
        assert_eq!(format!("{image:?}"), "Image { width: 3, height: 2, .. }");
    }
}
