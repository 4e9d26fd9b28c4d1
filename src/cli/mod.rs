use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod info;
mod ms2;
mod pairs;

use config::{Ms2Config, PairsConfig};

/// pairfinder - Isotope-labeled precursor pair finder for MS1/MS2 text files
#[derive(Parser)]
#[command(name = "pairfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find isotope-labeled precursor pairs in a directory of .ms1 files
    Pairs {
        /// Directory containing .ms1 files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output CSV path (defaults to PairFinderResult.csv inside DIR)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Mass error tolerance in ppm (default: 5)
        #[arg(short = 'e', long)]
        ppm: Option<f64>,

        /// Relative intensity threshold in percent of the base peak (default: 2)
        #[arg(short = 'i', long)]
        relative_intensity: Option<f64>,

        /// Retention time tolerance in minutes (default: 0.5)
        #[arg(short = 't', long)]
        rt_tolerance: Option<f64>,

        /// Label mass difference in Da (default: 6.0138)
        #[arg(short = 'l', long)]
        label_mass: Option<f64>,

        /// Isotope envelope similarity threshold (default: 0.75)
        #[arg(short = 's', long)]
        similarity: Option<f64>,
    },

    /// Find MS2 spectra matching a peptide's fragment ladder
    Ms2 {
        /// Directory containing .ms2 files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Target peptide, e.g. Q(+.98)GCTVTVSDLYAM(-48.00)NLEPR
        #[arg(short, long)]
        peptide: Option<String>,

        /// Output CSV path (defaults to Ms2SpecFinderRslt.csv inside DIR)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Fragment ion series (a, b, y, b-H2O, b-NH3, y-H2O, y-NH3; default: y)
        #[arg(long)]
        ion_type: Option<String>,

        /// Fragment tolerance (default: 0.2 Da)
        #[arg(short = 'e', long)]
        tolerance: Option<f64>,

        /// Interpret the fragment tolerance as ppm
        #[arg(long)]
        ppm: bool,

        /// Relative intensity threshold for matched fragments (default: 2)
        #[arg(short = 'i', long)]
        relative_intensity: Option<f64>,

        /// Minimum number of matched fragments (default: 4)
        #[arg(short = 'm', long)]
        min_matching: Option<usize>,

        /// Most intense matched fragment must exceed this (default: 2)
        #[arg(short = 't', long)]
        max_matching_intensity: Option<f64>,
    },

    /// Display summary statistics of an MS1/MS2 file
    Info {
        /// Input .ms1 or .ms2 file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
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
        Commands::Pairs {
            input,
            output,
            config,
            ppm,
            relative_intensity,
            rt_tolerance,
            label_mass,
            similarity,
        } => pairs::run(
            input,
            output,
            config,
            PairsConfig {
                tolerance_ppm: ppm,
                relative_intensity_threshold: relative_intensity,
                rt_tolerance,
                label_mass_diff: label_mass,
                similarity_threshold: similarity,
            },
        ),
        Commands::Ms2 {
            input,
            peptide,
            output,
            config,
            ion_type,
            tolerance,
            ppm,
            relative_intensity,
            min_matching,
            max_matching_intensity,
        } => ms2::run(
            input,
            output,
            config,
            Ms2Config {
                peptide,
                ion_type,
                tolerance,
                tolerance_is_ppm: ppm.then_some(true),
                relative_intensity_threshold: relative_intensity,
                min_matching_peaks: min_matching,
                max_matching_intensity_threshold: max_matching_intensity,
            },
        ),
        Commands::Info { file, json } => info::run(file, json),
    }
}
