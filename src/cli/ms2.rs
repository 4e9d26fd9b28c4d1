use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use pairfinder::fragments::FragmentTarget;
use pairfinder::peptide::{IonType, Peptide};
use pairfinder::pipeline::find_fragment_matches_in_dir;
use pairfinder::report::{write_fragment_matches_file, FRAGMENTS_REPORT_FILE};

use super::config::{Config, Ms2Config};

/// Search a directory of .ms2 files for spectra matching a peptide
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    flags: Ms2Config,
) -> Result<()> {
    let file_config = Config::load(config_path.as_deref())?;
    let settings = file_config.ms2.merge(flags);
    let config = settings.resolve();

    let peptide: Peptide = settings
        .peptide()
        .parse()
        .with_context(|| format!("Invalid peptide: {}", settings.peptide()))?;
    let ion_type: IonType = settings.ion_type().parse()?;
    let target = FragmentTarget::new(peptide, ion_type);
    let output = output.unwrap_or_else(|| input.join(FRAGMENTS_REPORT_FILE));

    info!("MS2 spectrum finder");
    info!("===================");
    info!("Input directory: {}", input.display());
    info!("Output: {}", output.display());
    info!("Peptide: {} ([M+H]+ {:.4})", target.peptide, target.peptide.mh_mass());
    info!("Ion series: {} ({} fragments)", ion_type, target.fragment_mzs.len());
    info!("Fragment tolerance: {}", config.tolerance());
    info!(
        "Relative intensity threshold: {}%",
        config.relative_intensity_threshold
    );
    info!("Minimum matching peaks: {}", config.min_matching_peaks);
    info!(
        "Maximum matching intensity threshold: {}",
        config.max_matching_intensity_threshold
    );

    let matches = find_fragment_matches_in_dir(&input, &target, &config)
        .with_context(|| format!("Fragment matching failed in {}", input.display()))?;

    let rows = write_fragment_matches_file(
        &output,
        ion_type,
        target.fragment_mzs.len(),
        &matches,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{} matching spectra written to {}", rows, output.display());
    Ok(())
}
