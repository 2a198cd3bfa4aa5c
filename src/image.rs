use std::ops::Range;

use crate::Result;

pub mod header;
pub mod partitioner;
pub mod reader;
pub mod sampler;
pub mod transformer;
pub mod writer;

pub trait ImageReader {
    type Metadata;

    fn read_image(&mut self) -> Result<(PixelGrid, Self::Metadata)>;
}

pub trait ImageWriter {
    fn write_image(&mut self, image: &PixelGrid) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    /// Value of every output pixel that no source pixel maps onto.
    pub const BACKGROUND: Pixel = Pixel::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels, `None` if it does not fit into `usize`.
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

/// Row-major grid of pixels, every row holding `width` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Creates a grid where every pixel is [`Pixel::BACKGROUND`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::BACKGROUND; width * height],
        }
    }

    /// Wraps row-major `pixels` into a grid.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly `width * height` pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Pixel>) -> Self {
        if pixels.len() != width * height {
            panic!(
                "Grid of {}x{} needs {} pixels, but {} were given",
                width,
                height,
                width * height,
                pixels.len()
            );
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn pixel(&self, row_index: usize, column_index: usize) -> Pixel {
        self.pixels[row_index * self.width + column_index]
    }

    pub fn row(&self, row_index: usize) -> &[Pixel] {
        let start = row_index * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        (0..self.height).map(|row_index| self.row(row_index))
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Hands out one mutable band per range.
    ///
    /// Ranges must be ordered, disjoint and inside the grid.
    pub fn bands_mut(&mut self, ranges: &[RowRange]) -> Vec<&mut [Pixel]> {
        let width = self.width;
        let height = self.height;
        let mut remaining: &mut [Pixel] = &mut self.pixels;
        let mut consumed_rows = 0;
        let mut bands = Vec::with_capacity(ranges.len());
        for range in ranges {
            if range.start < consumed_rows || range.end > height || range.start > range.end {
                panic!(
                    "Row range {:?} overlaps a previous range or leaves the grid of height {}",
                    range, height
                );
            }
            let skipped = (range.start - consumed_rows) * width;
            let (_, rest) = std::mem::take(&mut remaining).split_at_mut(skipped);
            let (band, rest) = rest.split_at_mut(range.len() * width);
            bands.push(band);
            remaining = rest;
            consumed_rows = range.end;
        }
        bands
    }

    /// Copies a rendered band of rows into the grid.
    pub fn write_band(&mut self, range: RowRange, band: &[Pixel]) {
        let start = range.start * self.width;
        let end = range.end * self.width;
        self.pixels[start..end].copy_from_slice(band);
    }
}

/// Half-open interval `[start, end)` of row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformRequest {
    Rotate { degrees: f64 },
    Scale { width: usize, height: usize },
}
