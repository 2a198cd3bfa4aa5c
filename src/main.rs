use std::env::args_os;
use std::process;

use bmp_transform::{transform_bitmap, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match transform_bitmap(&arguments) {
        Ok(report) => {
            println!(
                "Average execution time after {} iterations ({} threads): {} ms",
                report.iterations,
                report.number_of_threads,
                report.average_duration.as_millis()
            );
            println!(
                "Wrote {}x{} image to {}",
                report.output_dimensions.width,
                report.output_dimensions.height,
                arguments.output_file().display()
            );
        }
        Err(e) => {
            eprintln!("Transformation failed because of: {}", e);
            process::exit(1);
        }
    }
}
