use crate::{error::Error, Result};

use super::Dimensions;

pub const HEADER_SIZE: usize = 54;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const BITS_PER_PIXEL: u16 = 24;
pub const BYTES_PER_PIXEL: usize = 3;
const SIGNATURE: [u8; 2] = *b"BM";
const TRAILING_BYTES: usize = 2;

/// Padding bytes appended to every pixel row.
///
/// Computed as `width mod 4`. Because `-3 ≡ 1 (mod 4)` this equals the
/// usual `(4 - (3 * width) mod 4) mod 4` alignment of a row to four bytes.
pub fn row_padding(width: usize) -> usize {
    width % 4
}

/// Bytes that follow the header: every row with its padding plus the two
/// trailing zero bytes.
pub fn pixel_data_size(dimensions: Dimensions) -> usize {
    let row_size = BYTES_PER_PIXEL * dimensions.width + row_padding(dimensions.width);
    dimensions.height * row_size + TRAILING_BYTES
}

pub fn trailing_bytes() -> [u8; TRAILING_BYTES] {
    [0; TRAILING_BYTES]
}

/// The packed 54 byte file and info header, all fields little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    pub signature: [u8; 2],
    pub file_size: u32,
    pub reserved: u32,
    pub data_offset: u32,
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub data_size: u32,
    pub horizontal_resolution: i32,
    pub vertical_resolution: i32,
    pub colors: u32,
    pub important_colors: u32,
}

impl BitmapHeader {
    pub fn for_dimensions(dimensions: Dimensions) -> Result<Self> {
        let invalid = || {
            Error::InvalidImageDimensions(dimensions.width as i64, dimensions.height as i64)
        };
        let width = i32::try_from(dimensions.width).map_err(|_| invalid())?;
        let height = i32::try_from(dimensions.height).map_err(|_| invalid())?;
        let data_size = u32::try_from(pixel_data_size(dimensions)).map_err(|_| invalid())?;
        let file_size = data_size
            .checked_add(HEADER_SIZE as u32)
            .ok_or_else(invalid)?;
        Ok(Self {
            signature: SIGNATURE,
            file_size,
            reserved: 0,
            data_offset: HEADER_SIZE as u32,
            header_size: INFO_HEADER_SIZE,
            width,
            height,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            data_size,
            horizontal_resolution: 0,
            vertical_resolution: 0,
            colors: 0,
            important_colors: 0,
        })
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut fields = FieldReader { bytes, offset: 0 };
        Self {
            signature: [fields.u8(), fields.u8()],
            file_size: fields.u32(),
            reserved: fields.u32(),
            data_offset: fields.u32(),
            header_size: fields.u32(),
            width: fields.i32(),
            height: fields.i32(),
            planes: fields.u16(),
            bits_per_pixel: fields.u16(),
            compression: fields.u32(),
            data_size: fields.u32(),
            horizontal_resolution: fields.i32(),
            vertical_resolution: fields.i32(),
            colors: fields.u32(),
            important_colors: fields.u32(),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(&self.signature);
        bytes.extend_from_slice(&self.file_size.to_le_bytes());
        bytes.extend_from_slice(&self.reserved.to_le_bytes());
        bytes.extend_from_slice(&self.data_offset.to_le_bytes());
        bytes.extend_from_slice(&self.header_size.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.planes.to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        bytes.extend_from_slice(&self.compression.to_le_bytes());
        bytes.extend_from_slice(&self.data_size.to_le_bytes());
        bytes.extend_from_slice(&self.horizontal_resolution.to_le_bytes());
        bytes.extend_from_slice(&self.vertical_resolution.to_le_bytes());
        bytes.extend_from_slice(&self.colors.to_le_bytes());
        bytes.extend_from_slice(&self.important_colors.to_le_bytes());
        let mut packed = [0; HEADER_SIZE];
        packed.copy_from_slice(&bytes);
        packed
    }

    /// Rejects headers this codec cannot iterate over.
    pub fn validate(&self) -> Result<Dimensions> {
        if self.signature != SIGNATURE {
            return Err(Error::InvalidBitmapSignature(self.signature));
        }
        if self.bits_per_pixel != BITS_PER_PIXEL {
            return Err(Error::UnsupportedBitsPerPixel(self.bits_per_pixel));
        }
        if self.compression != 0 {
            return Err(Error::UnsupportedCompression(self.compression));
        }
        let invalid = || Error::InvalidImageDimensions(self.width as i64, self.height as i64);
        if self.width <= 0 || self.height <= 0 {
            return Err(invalid());
        }
        let dimensions = Dimensions::new(self.width as usize, self.height as usize);
        dimensions
            .area()
            .and_then(|area| area.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(invalid)?;
        Ok(dimensions)
    }
}

struct FieldReader<'a> {
    bytes: &'a [u8; HEADER_SIZE],
    offset: usize,
}

impl FieldReader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut field = [0; N];
        field.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        field
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }
}

#[cfg(test)]
mod test {
    use super::{row_padding, BitmapHeader, HEADER_SIZE};
    use crate::{error::Error, image::Dimensions};

    #[test]
    fn header_for_dimensions() {
        let header = BitmapHeader::for_dimensions(Dimensions::new(5, 3)).unwrap();
        // 3 rows of 15 pixel bytes and 1 padding byte, plus 2 trailing bytes
        assert_eq!(header.data_size, 50);
        assert_eq!(header.file_size, 104);
        assert_eq!(header.data_offset, HEADER_SIZE as u32);
        assert_eq!(header.header_size, 40);
        assert_eq!(header.planes, 1);
        assert_eq!(header.bits_per_pixel, 24);
        assert_eq!(header.compression, 0);
        assert_eq!(header.colors, 0);
    }

    #[test]
    fn packed_layout() {
        let header = BitmapHeader::for_dimensions(Dimensions::new(2, 1)).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(&bytes[10..14], &54u32.to_le_bytes());
        assert_eq!(&bytes[14..18], &40u32.to_le_bytes());
        assert_eq!(&bytes[18..22], &2i32.to_le_bytes());
        assert_eq!(&bytes[22..26], &1i32.to_le_bytes());
        assert_eq!(&bytes[26..28], &1u16.to_le_bytes());
        assert_eq!(&bytes[28..30], &24u16.to_le_bytes());
        assert_eq!(BitmapHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn padding_uses_width_modulo_four() {
        assert_eq!(row_padding(1), 1);
        assert_eq!(row_padding(2), 2);
        assert_eq!(row_padding(3), 3);
        assert_eq!(row_padding(4), 0);
        assert_eq!(row_padding(7), 3);
    }

    #[test]
    fn padding_aligns_rows_to_four_bytes() {
        for width in 0..64 {
            let row_size = 3 * width + row_padding(width);
            assert_eq!(row_size % 4, 0, "Row of width {} is not aligned", width);
            assert_eq!(row_padding(width), (4 - (3 * width) % 4) % 4);
        }
    }

    #[test]
    fn validate_accepts_own_header() {
        let header = BitmapHeader::for_dimensions(Dimensions::new(4, 2)).unwrap();
        assert_eq!(header.validate().unwrap(), Dimensions::new(4, 2));
    }

    #[test]
    fn validate_rejects_signature() {
        let mut header = BitmapHeader::for_dimensions(Dimensions::new(4, 2)).unwrap();
        header.signature = *b"PM";
        assert!(matches!(
            header.validate(),
            Err(Error::InvalidBitmapSignature([b'P', b'M']))
        ));
    }

    #[test]
    fn validate_rejects_bit_depth() {
        let mut header = BitmapHeader::for_dimensions(Dimensions::new(4, 2)).unwrap();
        header.bits_per_pixel = 32;
        assert!(matches!(
            header.validate(),
            Err(Error::UnsupportedBitsPerPixel(32))
        ));
    }

    #[test]
    fn validate_rejects_compression() {
        let mut header = BitmapHeader::for_dimensions(Dimensions::new(4, 2)).unwrap();
        header.compression = 1;
        assert!(matches!(
            header.validate(),
            Err(Error::UnsupportedCompression(1))
        ));
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let mut header = BitmapHeader::for_dimensions(Dimensions::new(4, 2)).unwrap();
        header.height = -2;
        assert!(matches!(
            header.validate(),
            Err(Error::InvalidImageDimensions(4, -2))
        ));
        header.height = 2;
        header.width = 0;
        assert!(matches!(
            header.validate(),
            Err(Error::InvalidImageDimensions(0, 2))
        ));
    }
}
