use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

pub use cli::CLIParser;
pub use error::Error;
pub use image::{
    header::BitmapHeader,
    partitioner::{partition_rows, ExecutionStrategy},
    reader::bmp::BitmapReader,
    transformer::{TransformationOptions, Transformer},
    writer::bmp::BitmapWriter,
    Dimensions, Pixel, PixelGrid, RowRange, TransformRequest,
};
use image::{ImageReader, ImageWriter};

mod cli;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    request: TransformRequest,
    number_of_threads: usize,
    iterations: u32,
    strategy: ExecutionStrategy,
}

impl Arguments {
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
}

pub struct TransformReport {
    pub iterations: u32,
    pub number_of_threads: usize,
    pub average_duration: Duration,
    pub output_dimensions: Dimensions,
}

fn path_to_string(file_path: &Path) -> String {
    file_path.to_string_lossy().into_owned()
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path)
        .map_err(|e| Error::UnableToOpenInputFileForReading(path_to_string(file_path), e))
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::UnableToOpenOutputFileForWriting(path_to_string(file_path), e))
}

fn create_output_directory(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(directory) if !directory.as_os_str().is_empty() => fs::create_dir_all(directory)
            .map_err(|e| Error::UnableToCreateOutputDirectory(path_to_string(directory), e)),
        _ => Ok(()),
    }
}

/// Reads a 24 bit bitmap and returns its pixels together with the header
/// exactly as found in the file.
pub fn decode(file_path: &Path) -> Result<(PixelGrid, BitmapHeader)> {
    let input_file = open_input_file(file_path)?;
    let mut reader = BitmapReader::new(BufReader::new(input_file));
    reader.read_image()
}

/// Writes `image` as a 24 bit bitmap with a header derived from its
/// dimensions.
pub fn encode(file_path: &Path, image: &PixelGrid) -> Result<()> {
    let output_file = open_output_file(file_path)?;
    let mut writer = BitmapWriter::new(BufWriter::new(output_file));
    writer.write_image(image)
}

/// Decodes the input, runs the requested transform `iterations` times and
/// writes the last result to the output file.
pub fn transform_bitmap(arguments: &Arguments) -> Result<TransformReport> {
    let (image, _) = decode(&arguments.input_file)?;
    let image = Arc::new(image);
    let transformer = Transformer::new(&TransformationOptions::from(arguments))?;
    let iterations = arguments.iterations.max(1);
    let mut total_duration = Duration::ZERO;
    let mut output_image = PixelGrid::new(0, 0);
    for iteration in 1..=iterations {
        let start = Instant::now();
        output_image = transformer.transform(&image, &arguments.request)?;
        let duration = start.elapsed();
        log::debug!(
            "Iteration {} finished after {} microseconds",
            iteration,
            duration.as_micros()
        );
        total_duration += duration;
    }
    create_output_directory(&arguments.output_file)?;
    encode(&arguments.output_file, &output_image)?;
    Ok(TransformReport {
        iterations,
        number_of_threads: transformer.number_of_threads(),
        average_duration: total_duration / iterations,
        output_dimensions: output_image.dimensions(),
    })
}
