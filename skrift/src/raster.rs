//! Signed area coverage accumulation.
//!
//! Every line drawn adds, for each pixel it passes through, the signed
//! height it covers in that pixel (`cover`) and that height weighted by the
//! fraction of the pixel to the right of the line (`area`). Summing the
//! covers of all cells to the left of a pixel in scan order and adding the
//! pixel's own area then yields its winding weighted coverage.

use raw::types::Point;

#[derive(Copy, Clone, Default, Debug)]
struct Cell {
    area: f32,
    cover: f32,
}

/// Accumulation buffer for one image.
pub(crate) struct Raster {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Raster {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Adds the contribution of a directed line to the cells it crosses.
    ///
    /// Both end points are expected to be inside the raster. Horizontal
    /// lines contribute nothing.
    pub(crate) fn draw_line(&mut self, origin: Point<f32>, goal: Point<f32>) {
        let delta = goal - origin;
        if delta.y == 0.0 || delta.y.is_nan() {
            return;
        }
        let dir_x = sign(delta.x);
        let dir_y = sign(delta.y);
        // distance, as a fraction of the line, between two crossings of a
        // pixel boundary on each axis
        let crossing_incr = Point::new(
            if dir_x != 0 { (1.0 / delta.x).abs() } else { 1.0 },
            (1.0 / delta.y).abs(),
        );
        let mut num_steps = 0i64;
        let mut pixel = Point::new(0i64, 0i64);
        let mut next_crossing = Point::new(0.0f32, 0.0f32);
        match dir_x {
            0 => {
                pixel.x = origin.x.floor() as i64;
                next_crossing.x = 100.0;
            }
            1 => {
                pixel.x = origin.x.floor() as i64;
                next_crossing.x =
                    crossing_incr.x - (origin.x - pixel.x as f32) * crossing_incr.x;
                num_steps += goal.x.ceil() as i64 - origin.x.floor() as i64 - 1;
            }
            _ => {
                pixel.x = origin.x.ceil() as i64 - 1;
                next_crossing.x = (origin.x - pixel.x as f32) * crossing_incr.x;
                num_steps += origin.x.ceil() as i64 - goal.x.floor() as i64 - 1;
            }
        }
        if dir_y > 0 {
            pixel.y = origin.y.floor() as i64;
            next_crossing.y = crossing_incr.y - (origin.y - pixel.y as f32) * crossing_incr.y;
            num_steps += goal.y.ceil() as i64 - origin.y.floor() as i64 - 1;
        } else {
            pixel.y = origin.y.ceil() as i64 - 1;
            next_crossing.y = (origin.y - pixel.y as f32) * crossing_incr.y;
            num_steps += origin.y.ceil() as i64 - goal.y.floor() as i64 - 1;
        }
        let half_delta_x = 0.5 * delta.x;
        let mut prev_distance = 0.0f32;
        let mut next_distance = next_crossing.x.min(next_crossing.y);
        for _ in 0..num_steps {
            let x_average = origin.x + (prev_distance + next_distance) * half_delta_x;
            let y_difference = (next_distance - prev_distance) * delta.y;
            self.add(pixel, x_average, y_difference);
            prev_distance = next_distance;
            if next_crossing.x < next_crossing.y {
                pixel.x += dir_x;
                next_crossing.x += crossing_incr.x;
            } else {
                pixel.y += dir_y;
                next_crossing.y += crossing_incr.y;
            }
            next_distance = next_crossing.x.min(next_crossing.y);
        }
        // remainder of the line up to the goal
        let x_average = origin.x + (prev_distance + 1.0) * half_delta_x;
        let y_difference = (1.0 - prev_distance) * delta.y;
        self.add(pixel, x_average, y_difference);
    }

    fn add(&mut self, pixel: Point<i64>, x_average: f32, y_difference: f32) {
        let (Ok(x), Ok(y)) = (usize::try_from(pixel.x), usize::try_from(pixel.y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(cell) = self.cells.get_mut(y * self.width + x) {
            cell.cover += y_difference;
            cell.area += (1.0 - (x_average - pixel.x as f32)) * y_difference;
        }
    }

    /// Integrates the cells in scan order into 8-bit coverage values.
    ///
    /// Writes one value per cell, stopping at the shorter of the two.
    pub(crate) fn accumulate(&self, pixels: &mut [u8]) {
        let mut accumulator = 0.0f32;
        for (cell, pixel) in self.cells.iter().zip(pixels) {
            let value = (accumulator + cell.area).abs().min(1.0);
            *pixel = (value * 255.0 + 0.5) as u8;
            accumulator += cell.cover;
        }
    }
}

fn sign(value: f32) -> i64 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
