use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dsgconvert::ncfile::FileFormat;
use dsgconvert::schema::FeatureType;

mod classify;
mod config;
mod convert;
mod info;
mod matchup;
mod validate;

/// dsg-convert - Tabular observations to CF Discrete Sampling Geometry netCDF
#[derive(Parser)]
#[command(name = "dsg-convert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// CF feature type of the output file.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FeatureTypeArg {
    /// Moving platform (ship, glider, drifter)
    Trajectory,
    /// Fixed station
    TimeSeries,
    /// Vertical cast
    Profile,
}

impl From<FeatureTypeArg> for FeatureType {
    fn from(arg: FeatureTypeArg) -> Self {
        match arg {
            FeatureTypeArg::Trajectory => FeatureType::Trajectory,
            FeatureTypeArg::TimeSeries => FeatureType::TimeSeries,
            FeatureTypeArg::Profile => FeatureType::Profile,
        }
    }
}

/// netCDF variant to write.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// CDF-1, 32-bit integers and time values
    Classic,
    /// CDF-5, 64-bit integers and time values
    Cdf5,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Classic => FileFormat::Classic,
            FormatArg::Cdf5 => FileFormat::Cdf5,
        }
    }
}

/// Settings shared by commands that write netCDF
#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Directory for the output file (defaults to the input's directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Feature type (defaults to the template's, then trajectory)
    #[arg(short = 't', long, value_enum)]
    feature_type: Option<FeatureTypeArg>,

    /// netCDF format
    #[arg(short = 'f', long, value_enum)]
    format: Option<FormatArg>,

    /// Identifier used when the template declares none
    #[arg(long)]
    feature_id: Option<String>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a delimited table to a CF-DSG netCDF file
    Convert {
        /// Input CSV/TSV file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Column template (JSON)
        #[arg(short = 'T', long, value_name = "TEMPLATE")]
        template: PathBuf,

        /// Field delimiter (a character, or tab/comma/semicolon/pipe)
        #[arg(short = 'd', long)]
        delimiter: Option<String>,

        /// Number of header lines; the last one names the columns
        #[arg(long)]
        header_lines: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Align long-form observation series on a time grid and encode them
    Matchup {
        /// Long-form CSV with timestamp,variable,value,unit columns
        #[arg(value_name = "OBSERVATIONS")]
        observations: PathBuf,

        /// Matchup request (JSON)
        #[arg(short = 'r', long, value_name = "REQUEST")]
        request: PathBuf,

        /// Extra template (JSON) contributing global attributes and feature id
        #[arg(short = 'T', long, value_name = "TEMPLATE")]
        template: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show how a template's columns would be classified
    Classify {
        /// Column template (JSON)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Feature type used to report missing roles
        #[arg(short = 't', long, value_enum)]
        feature_type: Option<FeatureTypeArg>,
    },

    /// Display the header of a netCDF file
    Info {
        /// Input netCDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Check a netCDF file against the CF-DSG conventions
    Validate {
        /// Input netCDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            template,
            delimiter,
            header_lines,
            output,
        } => convert::run(input, template, delimiter, header_lines, output),
        Commands::Matchup {
            observations,
            request,
            template,
            output,
        } => matchup::run(observations, request, template, output),
        Commands::Classify {
            template,
            feature_type,
        } => classify::run(template, feature_type.map(FeatureType::from)),
        Commands::Info { file } => info::run(file),
        Commands::Validate { file } => validate::run(file),
    }
}
