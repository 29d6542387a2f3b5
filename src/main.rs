//! # dsg-convert
//!
//! Command-line front end for converting observation tables into CF
//! Discrete Sampling Geometry netCDF files.
//!
//! ## Usage
//!
//! ```bash
//! # Convert a CSV using a JSON column template
//! dsg-convert convert cruise.csv --template cruise.json --feature-type trajectory
//!
//! # Align long-form series and encode the result
//! dsg-convert matchup readings.csv --request request.json -o out/
//!
//! # Inspect and validate the output
//! dsg-convert info out/cruise.nc
//! dsg-convert validate out/cruise.nc
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
