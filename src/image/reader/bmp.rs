use std::io::{self, Read, Seek, SeekFrom};

use super::super::header::{row_padding, BitmapHeader, BYTES_PER_PIXEL, HEADER_SIZE};
use super::super::{Dimensions, ImageReader, Pixel, PixelGrid};
use crate::{error::Error, logger, Result};

pub struct BitmapReader<T: Read + Seek> {
    reader: T,
}

impl<T: Read + Seek> BitmapReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }

    fn read_header(&mut self) -> Result<BitmapHeader> {
        let mut bytes = [0; HEADER_SIZE];
        self.reader
            .read_exact(&mut bytes)
            .map_err(|_| Error::TruncatedBitmapHeader)?;
        let header = BitmapHeader::from_bytes(&bytes);
        logger::log_header("Read", &header);
        Ok(header)
    }

    fn seek_to_pixel_data(&mut self, header: &BitmapHeader) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(header.data_offset as u64))
            .map_err(|_| Error::FailedToSeekToPixelData)?;
        Ok(())
    }

    /// Buffers grow with the bytes actually read, so a header declaring more
    /// rows than the file holds fails without reserving the declared size.
    fn read_pixels(&mut self, dimensions: Dimensions) -> Result<Vec<Pixel>> {
        let mut pixels = Vec::new();
        let mut row_bytes = Vec::new();
        let row_size = (dimensions.width * BYTES_PER_PIXEL) as u64;
        let padding = row_padding(dimensions.width) as u64;
        for row_index in 0..dimensions.height {
            self.read_row(row_size, &mut row_bytes)
                .map_err(|_| Error::TruncatedPixelData(row_index))?;
            pixels.extend(row_bytes.chunks_exact(BYTES_PER_PIXEL).map(pixel_from_bgr));
            self.skip_padding(padding)
                .map_err(|_| Error::TruncatedPixelData(row_index))?;
        }
        Ok(pixels)
    }

    fn read_row(&mut self, row_size: u64, row_bytes: &mut Vec<u8>) -> io::Result<()> {
        row_bytes.clear();
        let read = (&mut self.reader).take(row_size).read_to_end(row_bytes)?;
        if read as u64 != row_size {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(())
    }

    /// Padding of the last row may be missing without harm.
    fn skip_padding(&mut self, padding: u64) -> io::Result<()> {
        io::copy(&mut (&mut self.reader).take(padding), &mut io::sink())?;
        Ok(())
    }
}

impl<T: Read + Seek> ImageReader for BitmapReader<T> {
    type Metadata = BitmapHeader;

    fn read_image(&mut self) -> Result<(PixelGrid, BitmapHeader)> {
        let header = self.read_header()?;
        let dimensions = header.validate()?;
        self.seek_to_pixel_data(&header)?;
        let pixels = self.read_pixels(dimensions)?;
        let grid = PixelGrid::from_pixels(dimensions.width, dimensions.height, pixels);
        Ok((grid, header))
    }
}

fn pixel_from_bgr(bytes: &[u8]) -> Pixel {
    Pixel::new(bytes[2], bytes[1], bytes[0])
}
