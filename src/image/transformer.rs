use std::sync::Arc;

use super::partitioner::{ExecutionStrategy, RowPartitioner};
use super::sampler::{RotationSampler, ScaleSampler};
use super::{Dimensions, PixelGrid, TransformRequest};
use crate::{error::Error, Arguments, Result};

pub const DEFAULT_NUMBER_OF_THREADS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformationOptions {
    pub number_of_threads: usize,
    pub strategy: ExecutionStrategy,
}

impl Default for TransformationOptions {
    fn default() -> Self {
        Self {
            number_of_threads: DEFAULT_NUMBER_OF_THREADS,
            strategy: ExecutionStrategy::SpawnPerCall,
        }
    }
}

impl From<&Arguments> for TransformationOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            number_of_threads: value.number_of_threads,
            strategy: value.strategy,
        }
    }
}

/// Side of the square canvas that holds the source rotated by any angle:
/// twice the distance from the source center to a corner, rounded up.
pub fn rotated_canvas_side(source: Dimensions) -> usize {
    let center_x = source.width as f64 / 2.0;
    let center_y = source.height as f64 / 2.0;
    let radius = (center_x * center_x + center_y * center_y).sqrt();
    2 * radius.ceil() as usize
}

pub struct Transformer {
    partitioner: RowPartitioner,
}

impl Transformer {
    pub fn new(options: &TransformationOptions) -> Result<Self> {
        let partitioner = RowPartitioner::new(options.number_of_threads, options.strategy)?;
        Ok(Self { partitioner })
    }

    pub fn number_of_threads(&self) -> usize {
        self.partitioner.number_of_workers()
    }

    pub fn transform(&self, image: &Arc<PixelGrid>, request: &TransformRequest) -> Result<PixelGrid> {
        match *request {
            TransformRequest::Rotate { degrees } => self.rotate(image, degrees),
            TransformRequest::Scale { width, height } => self.scale(image, width, height),
        }
    }

    fn rotate(&self, image: &Arc<PixelGrid>, degrees: f64) -> Result<PixelGrid> {
        let side = rotated_canvas_side(image.dimensions());
        log::info!(
            "Rotating {}x{} image by {} degrees onto {}x{} canvas",
            image.width(),
            image.height(),
            degrees,
            side,
            side
        );
        let mut output = PixelGrid::new(side, side);
        let sampler = RotationSampler::new(degrees, image.dimensions(), output.dimensions());
        self.partitioner.run(image, sampler, &mut output)?;
        Ok(output)
    }

    fn scale(&self, image: &Arc<PixelGrid>, width: usize, height: usize) -> Result<PixelGrid> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageDimensions(width as i64, height as i64));
        }
        log::info!(
            "Scaling {}x{} image to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        let mut output = PixelGrid::new(width, height);
        let sampler = ScaleSampler::new(image.dimensions(), output.dimensions());
        self.partitioner.run(image, sampler, &mut output)?;
        Ok(output)
    }
}
