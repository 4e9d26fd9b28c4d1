use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use pairfinder::pipeline::find_pairs_in_dir;
use pairfinder::report::{write_pairs_file, PAIRS_REPORT_FILE};

use super::config::{Config, PairsConfig};

/// Find labeled pairs in a directory of .ms1 files and write the CSV table
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    flags: PairsConfig,
) -> Result<()> {
    let file_config = Config::load(config_path.as_deref())?;
    let config = file_config.pairs.merge(flags).resolve();
    let output = output.unwrap_or_else(|| input.join(PAIRS_REPORT_FILE));

    info!("Pair finder - labeled precursor pairs in MS1");
    info!("=============================================");
    info!("Input directory: {}", input.display());
    info!("Output: {}", output.display());
    info!("Tolerance: {} ppm", config.tolerance_ppm);
    info!(
        "Relative intensity threshold: {}%",
        config.relative_intensity_threshold
    );
    info!("RT tolerance: {} min", config.rt_tolerance);
    info!("Label mass difference: {} Da", config.label_mass_diff);
    info!("Similarity threshold: {}", config.similarity_threshold);

    let groups = find_pairs_in_dir(&input, &config)
        .with_context(|| format!("Pair finding failed in {}", input.display()))?;

    let rows = write_pairs_file(&output, &groups)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} pairs from {} files written to {}",
        rows,
        groups.len(),
        output.display()
    );
    Ok(())
}
