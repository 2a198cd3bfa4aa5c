use crate::image::partitioner::ExecutionStrategy;
use crate::image::transformer::DEFAULT_NUMBER_OF_THREADS;
use crate::image::TransformRequest;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

const ROTATE_COMMAND_NAME: &str = "Rotar";
const SCALE_COMMAND_NAME: &str = "Escalar";
const ROTATED_OUTPUT_FILE: &str = "Imagenes/Rotadas/rotada_hilos.bmp";
const SCALED_OUTPUT_FILE: &str = "Imagenes/Escaladas/escalada_hilos.bmp";
const DEFAULT_ITERATIONS: &str = "100";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        let command = Self::register_operations(command);
        CLIParser { command }
    }

    /// Parses the command line. Usage errors are printed to standard error
    /// and end the process with status 1.
    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| exit_with_usage_error(e));
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_threads_argument(command);
        let command = Self::register_iterations_argument(command);
        Self::register_strategy_argument(command)
    }

    fn register_operations(command: Command) -> Command {
        command
            .subcommand_required(true)
            .subcommand(Self::create_rotate_command())
            .subcommand(Self::create_scale_command())
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_iterations_argument(command: Command) -> Command {
        command.arg(Self::create_iterations_argument())
    }

    fn register_strategy_argument(command: Command) -> Command {
        command.arg(Self::create_strategy_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_rotate_command() -> Command {
        Command::new(ROTATE_COMMAND_NAME)
            .alias("rotate")
            .about("Rotate the image around its center")
            .arg(
                Arg::new("degrees")
                    .help("Rotation angle in degrees")
                    .value_parser(value_parser!(f64))
                    .allow_negative_numbers(true)
                    .required(true),
            )
    }

    fn create_scale_command() -> Command {
        Command::new(SCALE_COMMAND_NAME)
            .alias("scale")
            .about("Rescale the image with nearest-neighbor sampling")
            .arg(
                Arg::new("width")
                    .help("Target width in pixels")
                    .value_parser(value_parser!(u32).range(1..))
                    .required(true),
            )
            .arg(
                Arg::new("height")
                    .help("Target height in pixels")
                    .value_parser(value_parser!(u32).range(1..))
                    .required(true),
            )
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to 24 bit bitmap input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        arg!(output_file: -o --output_file <FILE> "Path to bitmap output file")
            .value_parser(value_parser!(PathBuf))
            .required(false)
            .global(true)
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of worker threads")
            .default_value(DEFAULT_NUMBER_OF_THREADS.to_string())
            .required(false)
            .value_parser(value_parser!(usize))
            .global(true)
    }

    fn create_iterations_argument() -> Arg {
        arg!(-i --iterations <ITERATIONS> "Number of timed repetitions of the transform")
            .default_value(DEFAULT_ITERATIONS)
            .required(false)
            .value_parser(value_parser!(u32).range(1..))
            .global(true)
    }

    fn create_strategy_argument() -> Arg {
        arg!(-s --strategy <STRATEGY> "How worker threads are provided")
            .default_value("spawn")
            .required(false)
            .value_parser(value_parser!(ExecutionStrategy))
            .global(true)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        let (request, operation_matches) = Self::extract_request(matches);
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(operation_matches, &request),
            request,
            number_of_threads: Self::extract_threads_argument(operation_matches),
            iterations: Self::extract_iterations_argument(operation_matches),
            strategy: Self::extract_strategy_argument(operation_matches),
        }
    }

    fn extract_request(matches: &ArgMatches) -> (TransformRequest, &ArgMatches) {
        match matches.subcommand() {
            Some((ROTATE_COMMAND_NAME, operation_matches)) => (
                Self::extract_rotate_request(operation_matches),
                operation_matches,
            ),
            Some((SCALE_COMMAND_NAME, operation_matches)) => (
                Self::extract_scale_request(operation_matches),
                operation_matches,
            ),
            _ => unreachable!("An operation subcommand is required"),
        }
    }

    fn extract_rotate_request(matches: &ArgMatches) -> TransformRequest {
        let degrees = matches
            .get_one::<f64>("degrees")
            .expect("Required argument degrees not provided")
            .to_owned();
        TransformRequest::Rotate { degrees }
    }

    fn extract_scale_request(matches: &ArgMatches) -> TransformRequest {
        let width = matches
            .get_one::<u32>("width")
            .expect("Required argument width not provided")
            .to_owned();
        let height = matches
            .get_one::<u32>("height")
            .expect("Required argument height not provided")
            .to_owned();
        TransformRequest::Scale {
            width: width as usize,
            height: height as usize,
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches, request: &TransformRequest) -> PathBuf {
        match matches.get_one::<PathBuf>("output_file") {
            Some(output_file) => output_file.clone(),
            None => PathBuf::from(default_output_file(request)),
        }
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_iterations_argument(matches: &ArgMatches) -> u32 {
        matches
            .get_one::<u32>("iterations")
            .expect("Number of iterations must be provided, but was unset.")
            .to_owned()
    }

    fn extract_strategy_argument(matches: &ArgMatches) -> ExecutionStrategy {
        matches
            .get_one::<ExecutionStrategy>("strategy")
            .expect("Execution strategy must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn default_output_file(request: &TransformRequest) -> &'static str {
    match request {
        TransformRequest::Rotate { .. } => ROTATED_OUTPUT_FILE,
        TransformRequest::Scale { .. } => SCALED_OUTPUT_FILE,
    }
}

fn exit_with_usage_error(error: clap::Error) -> ! {
    if !error.use_stderr() {
        // help and version output
        error.exit();
    }
    let _ = error.print();
    process::exit(1)
}
