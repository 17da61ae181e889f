// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Have processes pair up and exchange their rank numbers.
//!
//! See `lib.rs` for details.

use clap::Parser;
use log::LevelFilter;
use pair_exchange::run;
use simplelog::{ConfigBuilder, SimpleLogger};
use telegraph_runtime::types::CommError;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Pair-exchange patternlet: paired processes swap their rank numbers")]
struct Cli {
    /// The number of processes to launch, in the role of `mpirun -np N`.
    #[arg(long, default_value = "4")]
    num_processes: usize,

    /// Enable logging to the console.
    #[arg(long, default_value = "false")]
    stdout: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,
}

/// Install the console logger.
fn setup_logging(level: log::Level) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    SimpleLogger::init(level.to_level_filter(), config).unwrap();
}

fn main() -> Result<(), CommError> {
    let args = Cli::parse();
    if args.stdout {
        setup_logging(args.stdout_level);
    }

    run(args.num_processes)?;
    Ok(())
}
