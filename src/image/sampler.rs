//! Inverse mapping from output coordinates back into the source image.
//!
//! Every sampler walks one output row at a time, computes the real-valued
//! source coordinate of each output pixel and copies the source pixel found
//! by truncating that coordinate. Coordinates outside the source leave the
//! output pixel untouched, so it keeps [`Pixel::BACKGROUND`].

use std::f64::consts::PI;

use super::{Dimensions, Pixel, PixelGrid};

pub trait Sampler: Send + Sync {
    fn sample_row(&self, source: &PixelGrid, row_index: usize, row: &mut [Pixel]);
}

fn source_pixel(source: &PixelGrid, x: f64, y: f64) -> Option<Pixel> {
    let inside = x >= 0.0 && x < source.width() as f64 && y >= 0.0 && y < source.height() as f64;
    // `as usize` truncates toward zero, which is floor for the checked range
    inside.then(|| source.pixel(y as usize, x as usize))
}

/// Rotation around the image center. The destination is expected to be
/// large enough to hold the rotated source.
#[derive(Clone, Copy, Debug)]
pub struct RotationSampler {
    cos: f64,
    sin: f64,
    source_center_x: f64,
    source_center_y: f64,
    destination_center_x: f64,
    destination_center_y: f64,
}

impl RotationSampler {
    pub fn new(degrees: f64, source: Dimensions, destination: Dimensions) -> Self {
        let radians = degrees * PI / 180.0;
        Self {
            cos: radians.cos(),
            sin: radians.sin(),
            source_center_x: source.width as f64 / 2.0,
            source_center_y: source.height as f64 / 2.0,
            destination_center_x: destination.width as f64 / 2.0,
            destination_center_y: destination.height as f64 / 2.0,
        }
    }
}

impl Sampler for RotationSampler {
    fn sample_row(&self, source: &PixelGrid, row_index: usize, row: &mut [Pixel]) {
        let dy = row_index as f64 - self.destination_center_y;
        for (column_index, pixel) in row.iter_mut().enumerate() {
            let dx = column_index as f64 - self.destination_center_x;
            let x = dx * self.cos - dy * self.sin + self.source_center_x;
            let y = dx * self.sin + dy * self.cos + self.source_center_y;
            if let Some(value) = source_pixel(source, x, y) {
                *pixel = value;
            }
        }
    }
}

/// Nearest-neighbor rescaling without any filtering.
#[derive(Clone, Copy, Debug)]
pub struct ScaleSampler {
    horizontal_factor: f64,
    vertical_factor: f64,
}

impl ScaleSampler {
    pub fn new(source: Dimensions, destination: Dimensions) -> Self {
        Self {
            horizontal_factor: source.width as f64 / destination.width as f64,
            vertical_factor: source.height as f64 / destination.height as f64,
        }
    }
}

impl Sampler for ScaleSampler {
    fn sample_row(&self, source: &PixelGrid, row_index: usize, row: &mut [Pixel]) {
        let y = row_index as f64 * self.vertical_factor;
        for (column_index, pixel) in row.iter_mut().enumerate() {
            let x = column_index as f64 * self.horizontal_factor;
            if let Some(value) = source_pixel(source, x, y) {
                *pixel = value;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use super::{source_pixel, RotationSampler, Sampler, ScaleSampler};
    use crate::image::{
        test_images::{gradient, BLUE, GREEN, RED, WHITE},
        Dimensions, Pixel, PixelGrid,
    };

    const EPSILON: f64 = 1e-9;

    fn render(source: &PixelGrid, sampler: &impl Sampler, destination: Dimensions) -> PixelGrid {
        let mut output = PixelGrid::new(destination.width, destination.height);
        let ranges = [crate::image::RowRange::new(0, destination.height)];
        let band = output.bands_mut(&ranges).remove(0);
        for (row_index, row) in band.chunks_mut(destination.width).enumerate() {
            sampler.sample_row(source, row_index, row);
        }
        output
    }

    #[test]
    fn rotation_by_zero_shifts_to_center() {
        let source = gradient(4, 4);
        let destination = Dimensions::new(6, 6);
        let sampler = RotationSampler::new(0.0, source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        for row in 0..6 {
            for column in 0..6 {
                let expected = if (1..5).contains(&row) && (1..5).contains(&column) {
                    source.pixel(row - 1, column - 1)
                } else {
                    Pixel::BACKGROUND
                };
                assert_eq!(
                    output.pixel(row, column),
                    expected,
                    "Pixel at row {}, column {} does not match",
                    row,
                    column
                );
            }
        }
    }

    /// Pixels a sample at `(x, y)` may yield once rounding error in the
    /// trigonometric terms moves the coordinate by at most `EPSILON`.
    fn acceptable_pixels(source: &PixelGrid, x: f64, y: f64) -> Vec<Pixel> {
        let offsets = [-EPSILON, 0.0, EPSILON];
        offsets
            .iter()
            .flat_map(|dx| offsets.iter().map(move |dy| (x + dx, y + dy)))
            .map(|(x, y)| source_pixel(source, x, y).unwrap_or(Pixel::BACKGROUND))
            .collect()
    }

    /// Checks every output pixel against the exact inverse mapping, where
    /// `mapping` takes the offset from the destination center to the offset
    /// from the source center.
    fn assert_rotation_matches(
        source: &PixelGrid,
        output: &PixelGrid,
        mapping: impl Fn(f64, f64) -> (f64, f64),
    ) {
        let source_center_x = source.width() as f64 / 2.0;
        let source_center_y = source.height() as f64 / 2.0;
        let destination_center_x = output.width() as f64 / 2.0;
        let destination_center_y = output.height() as f64 / 2.0;
        for row in 0..output.height() {
            for column in 0..output.width() {
                let (dx, dy) = mapping(
                    column as f64 - destination_center_x,
                    row as f64 - destination_center_y,
                );
                let candidates =
                    acceptable_pixels(source, dx + source_center_x, dy + source_center_y);
                assert!(
                    candidates.contains(&output.pixel(row, column)),
                    "Pixel at row {}, column {} is {:?}, expected one of {:?}",
                    row,
                    column,
                    output.pixel(row, column),
                    candidates
                );
            }
        }
    }

    #[test]
    fn angle_is_converted_without_reduction() {
        let source = Dimensions::new(4, 4);
        let destination = Dimensions::new(6, 6);
        for degrees in [-270.0, -180.0, -90.0, -45.0, 360.0, 450.0, 540.0, 810.0] {
            let sampler = RotationSampler::new(degrees, source, destination);
            let radians = degrees * PI / 180.0;
            assert_eq!(sampler.cos, radians.cos(), "cos of {} degrees", degrees);
            assert_eq!(sampler.sin, radians.sin(), "sin of {} degrees", degrees);
        }
    }

    #[test]
    fn rotation_by_full_turn_equals_zero() {
        let source = gradient(4, 4);
        let destination = Dimensions::new(6, 6);
        let full_turn = render(
            &source,
            &RotationSampler::new(360.0, source.dimensions(), destination),
            destination,
        );
        assert_rotation_matches(&source, &full_turn, |dx, dy| (dx, dy));
    }

    #[test]
    fn rotation_by_half_turn_mirrors_both_axes() {
        let source = gradient(4, 4);
        let destination = Dimensions::new(6, 6);
        let sampler = RotationSampler::new(180.0, source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        assert_rotation_matches(&source, &output, |dx, dy| (-dx, -dy));
        assert_eq!(output.pixel(3, 3), source.pixel(2, 2));
        assert_eq!(output.pixel(2, 2), source.pixel(3, 3));
    }

    #[test]
    fn rotation_by_negative_angles() {
        let source = gradient(4, 4);
        let destination = Dimensions::new(6, 6);
        let quarter = render(
            &source,
            &RotationSampler::new(-90.0, source.dimensions(), destination),
            destination,
        );
        // cos = 0, sin = -1
        assert_rotation_matches(&source, &quarter, |dx, dy| (dy, -dx));
        let three_quarters = render(
            &source,
            &RotationSampler::new(-270.0, source.dimensions(), destination),
            destination,
        );
        assert_rotation_matches(&source, &three_quarters, |dx, dy| (-dy, dx));
    }

    #[test]
    fn rotation_keeps_every_covered_pixel_from_source() {
        let source = gradient(6, 4);
        let destination = Dimensions::new(8, 8);
        let sampler = RotationSampler::new(33.0, source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        let covered = output
            .pixels()
            .iter()
            .filter(|&&p| p != Pixel::BACKGROUND)
            .inspect(|&&p| assert!(source.pixels().contains(&p)))
            .count();
        assert!(covered > 0);
    }

    #[test]
    fn scale_to_same_size_is_identity() {
        let source = gradient(5, 3);
        let sampler = ScaleSampler::new(source.dimensions(), source.dimensions());
        let output = render(&source, &sampler, source.dimensions());
        assert_eq!(output, source);
    }

    #[test]
    fn scale_to_half_selects_every_second_pixel() {
        let source = gradient(4, 4);
        let destination = Dimensions::new(2, 2);
        let sampler = ScaleSampler::new(source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        assert_eq!(output.pixel(0, 0), source.pixel(0, 0));
        assert_eq!(output.pixel(0, 1), source.pixel(0, 2));
        assert_eq!(output.pixel(1, 0), source.pixel(2, 0));
        assert_eq!(output.pixel(1, 1), source.pixel(2, 2));
    }

    #[test]
    fn scale_two_by_two_to_four_by_four_replicates_blocks() {
        let source = PixelGrid::from_pixels(2, 2, vec![RED, GREEN, BLUE, WHITE]);
        let destination = Dimensions::new(4, 4);
        let sampler = ScaleSampler::new(source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        #[rustfmt::skip]
        let expected = [
            RED, RED, GREEN, GREEN,
            RED, RED, GREEN, GREEN,
            BLUE, BLUE, WHITE, WHITE,
            BLUE, BLUE, WHITE, WHITE,
        ];
        assert_eq!(output.pixels(), &expected);
    }

    #[test]
    fn scale_truncates_instead_of_rounding() {
        // 3 -> 2 columns: x = 0.0 and 1.5, truncated to 0 and 1
        let source = gradient(3, 1);
        let destination = Dimensions::new(2, 1);
        let sampler = ScaleSampler::new(source.dimensions(), destination);
        let output = render(&source, &sampler, destination);
        assert_eq!(output.pixel(0, 0), source.pixel(0, 0));
        assert_eq!(output.pixel(0, 1), source.pixel(0, 1));
    }
}
