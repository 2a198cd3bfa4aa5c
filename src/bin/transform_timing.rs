use std::sync::Arc;
use std::time::{Duration, Instant};

use bmp_transform::{
    ExecutionStrategy, Pixel, PixelGrid, TransformRequest, TransformationOptions, Transformer,
};

const IMAGE_WIDTH: usize = 1920;
const IMAGE_HEIGHT: usize = 1080;
const NUMBER_OF_THREADS: usize = 8;
const NUMBER_OF_ROUNDS: u32 = 10;

fn create_test_image() -> PixelGrid {
    let pixels = (0..IMAGE_WIDTH * IMAGE_HEIGHT)
        .map(|index| {
            let x = index % IMAGE_WIDTH;
            let y = index / IMAGE_WIDTH;
            Pixel::new((x % 256) as u8, (y % 256) as u8, ((x + y * 8) % 256) as u8)
        })
        .collect();
    PixelGrid::from_pixels(IMAGE_WIDTH, IMAGE_HEIGHT, pixels)
}

fn calculate_std_deviation_in_micros(mean: &Duration, measurements: &[Duration]) -> u64 {
    let mean_micros = mean.as_micros() as i128;
    let sum = measurements
        .iter()
        .map(|m| m.as_micros() as i128 - mean_micros)
        .map(|v| v.pow(2).unsigned_abs())
        .sum::<u128>();
    let variance = sum / measurements.len() as u128;
    (variance as f64).sqrt().round() as u64
}

fn measure(
    name: &str,
    transformer: &Transformer,
    image: &Arc<PixelGrid>,
    request: &TransformRequest,
) {
    println!("Starting {}", name);
    let mut durations: Vec<Duration> = Vec::new();

    for round in 1..=NUMBER_OF_ROUNDS {
        let start = Instant::now();
        if let Err(e) = transformer.transform(image, request) {
            eprintln!("Round {} failed because of: {}", round, e);
            return;
        }
        let duration = start.elapsed();

        println!(
            "Finished round {} after {} microseconds",
            round,
            duration.as_micros(),
        );
        durations.push(duration);
    }

    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();
    let avg_duration = durations.iter().sum::<Duration>() / NUMBER_OF_ROUNDS;
    let std_deviation = calculate_std_deviation_in_micros(&avg_duration, &durations);

    println!(
        "{}: Min: {}, Max: {}, Average: {}, Std Deviation: {}",
        name,
        min_duration.as_micros(),
        max_duration.as_micros(),
        avg_duration.as_micros(),
        std_deviation,
    );
}

fn main() {
    println!("Creating test image");
    let image = Arc::new(create_test_image());
    let requests = [
        ("rotation by 45 degrees", TransformRequest::Rotate { degrees: 45.0 }),
        (
            "scaling to half size",
            TransformRequest::Scale {
                width: IMAGE_WIDTH / 2,
                height: IMAGE_HEIGHT / 2,
            },
        ),
    ];

    for strategy in [ExecutionStrategy::SpawnPerCall, ExecutionStrategy::Pooled] {
        let options = TransformationOptions {
            number_of_threads: NUMBER_OF_THREADS,
            strategy,
        };
        let transformer = match Transformer::new(&options) {
            Ok(transformer) => transformer,
            Err(e) => {
                eprintln!("Creating transformer failed because of: {}", e);
                return;
            }
        };
        for (name, request) in &requests {
            measure(&format!("{} ({:?})", name, strategy), &transformer, &image, request);
        }
    }
}
