use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::time::Instant;
use vantage_math::{
    Matrix4,
    benchmark::{self, Target},
};

/// Largest element difference tolerated between a dispatched result and
/// its reference before the run is reported as failed.
const DEVIATION_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Parser)]
#[command(about = "Homogeneous transform matrices with property-driven fast paths", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Time dispatched kernels against the computations they stand in for
    Benchmark {
        /// Target to time (all targets are timed if omitted)
        #[arg(short, long, value_enum)]
        target: Option<Target>,

        /// Number of seconds to time each computation for (it will always be
        /// called at least once)
        #[arg(short, long, default_value_t = 0.0)]
        duration: f64,

        /// Minimum number of seconds from the program is started until timing
        /// begins
        #[arg(long, default_value_t = 0.0)]
        delay: f64,
    },
    /// Print a matrix given as 16 column-major elements with its inferred
    /// properties
    Properties {
        /// Elements in column-major order
        #[arg(num_args = 16, allow_negative_numbers = true)]
        elements: Vec<f64>,
    },
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    match Cli::parse().command {
        Command::Benchmark {
            target,
            duration,
            delay,
        } => {
            benchmark::wait_until(program_start, delay);

            let targets = target.map_or_else(|| Target::ALL.to_vec(), |target| vec![target]);
            for target in targets {
                let comparison = benchmark::compare(target, duration);
                log::info!("{comparison}");

                if comparison.deviation.is_nan() || comparison.deviation > DEVIATION_TOLERANCE {
                    bail!(
                        "Dispatched and reference results for {:?} differ by {:e}",
                        target,
                        comparison.deviation
                    );
                }
            }
        }
        Command::Properties { elements } => {
            let elements = <[f64; 16]>::try_from(elements).map_err(|elements| {
                anyhow!("Expected 16 matrix elements, got {}", elements.len())
            })?;
            let matrix = Matrix4::from_cols_array(elements);
            println!("{matrix}");
            println!("{:?}", matrix.properties());
        }
    }
    Ok(())
}
