use anyhow::{Context, Result};
use std::path::PathBuf;

use pairfinder::msn::{MsnStreamer, MsnSummary};

/// Display summary statistics of an MS1/MS2 file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let streamer = MsnStreamer::open(&file).context("Failed to open file")?;
    let mut summary = MsnSummary::default();
    let mut spectra = streamer.spectra();
    for spectrum in spectra.by_ref() {
        let spectrum =
            spectrum.with_context(|| format!("Failed to parse {}", file.display()))?;
        summary.record(&spectrum);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    println!("MS1/MS2 File Information");
    println!("========================");
    println!("File: {}", file.display());
    println!("Header lines: {}", spectra.header_lines().len());
    println!();
    print!("{}", summary.format_colored());

    Ok(())
}
