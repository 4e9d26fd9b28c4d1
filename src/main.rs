//! # pairfinder
//!
//! Command-line tool for finding isotope-labeled precursor pairs in MS1
//! text files and peptide fragment matches in MS2 text files.
//!
//! ## Usage
//!
//! ```bash
//! # Find labeled pairs in every .ms1 file of a directory
//! pairfinder pairs data/ms1/
//!
//! # Find MS2 spectra of a target peptide
//! pairfinder ms2 data/ms2/ -p "Q(+.98)GCTVTVSDLYAM(-48.00)NLEPR"
//!
//! # Summarize one file
//! pairfinder info run.ms1
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
