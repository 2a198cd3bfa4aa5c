use std::io::Write;

use super::super::header::{row_padding, trailing_bytes, BitmapHeader, BYTES_PER_PIXEL};
use super::super::{ImageWriter, Pixel, PixelGrid};
use crate::{error::Error, logger, Result};

pub struct BitmapWriter<T: Write> {
    writer: T,
}

impl<T: Write> BitmapWriter<T> {
    pub fn new(writer: T) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, image: &PixelGrid) -> Result<()> {
        let header = BitmapHeader::for_dimensions(image.dimensions())?;
        logger::log_header("Writing", &header);
        self.writer
            .write_all(&header.to_bytes())
            .map_err(|_| Error::FailedToWriteBitmapHeader)
    }

    fn write_pixels(&mut self, image: &PixelGrid) -> Result<()> {
        let padding = vec![0; row_padding(image.width())];
        let mut row_bytes = Vec::with_capacity(image.width() * BYTES_PER_PIXEL + padding.len());
        for row in image.rows() {
            row_bytes.clear();
            row_bytes.extend(row.iter().flat_map(bgr_from_pixel));
            row_bytes.extend_from_slice(&padding);
            self.writer
                .write_all(&row_bytes)
                .map_err(|_| Error::FailedToWritePixelData)?;
        }
        self.writer
            .write_all(&trailing_bytes())
            .map_err(|_| Error::FailedToWritePixelData)
    }
}

impl<T: Write> ImageWriter for BitmapWriter<T> {
    fn write_image(&mut self, image: &PixelGrid) -> Result<()> {
        self.write_header(image)?;
        self.write_pixels(image)?;
        self.writer
            .flush()
            .map_err(|_| Error::FailedToWritePixelData)
    }
}

fn bgr_from_pixel(pixel: &Pixel) -> [u8; BYTES_PER_PIXEL] {
    [pixel.blue, pixel.green, pixel.red]
}
