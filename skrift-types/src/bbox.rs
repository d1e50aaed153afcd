/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction-- the left side of a region.
    pub x_min: T,
    /// Minimum extent in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the bottom of a region.
    pub y_min: T,
    /// Maximum extent in the x direction-- the right side of a region.
    pub x_max: T,
    /// Maximum extend in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the top of the
    /// region.
    pub y_max: T,
}

impl<T: PartialOrd> BoundingBox<T> {
    /// Returns `true` if the box has a strictly positive width and height.
    pub fn is_proper(&self) -> bool {
        self.x_max > self.x_min && self.y_max > self.y_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proper_boxes() {
        let bbox = BoundingBox {
            x_min: 0,
            y_min: 0,
            x_max: 10,
            y_max: 5,
        };
        assert!(bbox.is_proper());
        let flat = BoundingBox { y_max: 0, ..bbox };
        assert!(!flat.is_proper());
        let inverted = BoundingBox { x_max: -1, ..bbox };
        assert!(!inverted.is_proper());
    }
}
