use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    UnableToCreateOutputDirectory(String, std::io::Error),
    TruncatedBitmapHeader,
    InvalidBitmapSignature([u8; 2]),
    UnsupportedBitsPerPixel(u16),
    UnsupportedCompression(u32),
    InvalidImageDimensions(i64, i64),
    FailedToSeekToPixelData,
    TruncatedPixelData(usize),
    FailedToWriteBitmapHeader,
    FailedToWritePixelData,
    InvalidWorkerCount(usize),
    WorkerPanicked,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::UnableToCreateOutputDirectory(path, error) => {
                write!(f, "Unable to create output directory '{}': {}", path, error)
            }
            Self::TruncatedBitmapHeader => {
                write!(f, "Bitmap file ends before the end of its header")
            }
            Self::InvalidBitmapSignature(signature) => {
                write!(
                    f,
                    "Expected bitmap signature 'BM', but found {:02X} {:02X}",
                    signature[0], signature[1]
                )
            }
            Self::UnsupportedBitsPerPixel(bits) => {
                write!(
                    f,
                    "Only 24 bits per pixel are supported, but header declares {}",
                    bits
                )
            }
            Self::UnsupportedCompression(compression) => {
                write!(
                    f,
                    "Only uncompressed bitmaps are supported, but header declares compression {}",
                    compression
                )
            }
            Self::InvalidImageDimensions(width, height) => {
                write!(
                    f,
                    "Image dimensions {}x{} are invalid. Width and height must be positive.",
                    width, height
                )
            }
            Self::FailedToSeekToPixelData => {
                write!(f, "Failed to seek to the start of the pixel data")
            }
            Self::TruncatedPixelData(row) => {
                write!(f, "Pixel data ends unexpectedly in row {}", row)
            }
            Self::FailedToWriteBitmapHeader => write!(f, "Failed to write bitmap header"),
            Self::FailedToWritePixelData => write!(f, "Failed to write pixel data"),
            Self::InvalidWorkerCount(count) => {
                write!(
                    f,
                    "Number of worker threads must be at least 1, but was {}",
                    count
                )
            }
            Self::WorkerPanicked => write!(f, "A worker thread panicked during the transform"),
        }
    }
}

impl std::error::Error for Error {}
