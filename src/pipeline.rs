//! Directory-level drivers.
//!
//! Discovers `.ms1` / `.ms2` files in a directory, processes each file
//! independently (in parallel with the `parallel` feature) and gathers the
//! per-file results in file-name order.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

use crate::constants::{DEFAULT_LABEL_MASS_DIFF, MS1_EXTENSION, MS2_EXTENSION};
use crate::features::{find_features_in_file, ExtractionParams, PrecursorFeature};
use crate::fragments::{find_matches_in_file, FragmentMatchConfig, FragmentTarget, SpectrumMatch};
use crate::grouping::{group_features, FeatureGroups, GroupingParams};
use crate::locator::Tolerance;
use crate::msn::MsnError;
use crate::pairing::PairingParams;

/// Errors raised by the directory drivers
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input path does not exist or is not a directory
    #[error("Input directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Directory listing failed
    #[error("Failed to list {}: {source}", .path.display())]
    ListError {
        /// Directory being listed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A file failed to parse
    #[error(transparent)]
    Msn(#[from] MsnError),
}

/// Parameters for pair finding over MS1 files
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairFinderConfig {
    /// Mass error tolerance in ppm
    pub tolerance_ppm: f64,
    /// Minimum peak intensity as a percentage of the base peak
    pub relative_intensity_threshold: f64,
    /// Retention time tolerance for grouping, in minutes
    pub rt_tolerance: f64,
    /// Mass difference introduced by the label (Da)
    pub label_mass_diff: f64,
    /// Minimum isotope envelope similarity
    pub similarity_threshold: f64,
}

impl Default for PairFinderConfig {
    fn default() -> Self {
        Self {
            tolerance_ppm: 5.0,
            relative_intensity_threshold: 2.0,
            rt_tolerance: 0.5,
            label_mass_diff: DEFAULT_LABEL_MASS_DIFF,
            similarity_threshold: 0.75,
        }
    }
}

impl PairFinderConfig {
    /// Per-spectrum extraction parameters
    pub fn extraction_params(&self) -> ExtractionParams {
        ExtractionParams {
            pairing: PairingParams {
                tolerance_ppm: self.tolerance_ppm,
                label_mass_diff: self.label_mass_diff,
                similarity_threshold: self.similarity_threshold,
            },
            relative_intensity_threshold: self.relative_intensity_threshold,
        }
    }

    /// Cross-scan grouping parameters
    pub fn grouping_params(&self) -> GroupingParams {
        GroupingParams {
            tolerance: Tolerance::Ppm(self.tolerance_ppm),
            rt_tolerance: self.rt_tolerance,
        }
    }
}

/// List regular files in `dir` whose extension is `extension`, sorted by name
pub fn discover_files<P: AsRef<Path>>(
    dir: P,
    extension: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PipelineError::NotADirectory(dir.to_path_buf()));
    }

    let list_error = |source| PipelineError::ListError {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let path = entry.map_err(list_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();

    debug!(
        "Found {} .{} files in {}",
        files.len(),
        extension,
        dir.display()
    );
    Ok(files)
}

#[cfg(feature = "parallel")]
fn process_files<T, F>(files: &[PathBuf], f: F) -> Result<Vec<Vec<T>>, MsnError>
where
    T: Send,
    F: Fn(&Path) -> Result<Vec<T>, MsnError> + Sync + Send,
{
    files.par_iter().map(|path| f(path.as_path())).collect()
}

#[cfg(not(feature = "parallel"))]
fn process_files<T, F>(files: &[PathBuf], f: F) -> Result<Vec<Vec<T>>, MsnError>
where
    F: Fn(&Path) -> Result<Vec<T>, MsnError>,
{
    files.iter().map(|path| f(path.as_path())).collect()
}

/// Extract and group labeled precursor features from the given MS1 files
pub fn find_pairs_in_files(
    files: &[PathBuf],
    config: &PairFinderConfig,
) -> Result<FeatureGroups, PipelineError> {
    let params = config.extraction_params();
    let per_file = process_files(files, |path| find_features_in_file(path, &params))?;

    let features: Vec<PrecursorFeature> = per_file.into_iter().flatten().collect();
    let num_candidates = features.len();
    let groups = group_features(features, &config.grouping_params());

    info!(
        "{} files: {} candidate features, {} after grouping",
        files.len(),
        num_candidates,
        groups.num_features()
    );
    Ok(groups)
}

/// Find labeled precursor pairs in every `.ms1` file of a directory
pub fn find_pairs_in_dir<P: AsRef<Path>>(
    dir: P,
    config: &PairFinderConfig,
) -> Result<FeatureGroups, PipelineError> {
    let files = discover_files(dir, MS1_EXTENSION)?;
    find_pairs_in_files(&files, config)
}

/// Match a fragment ladder against every spectrum of the given MS2 files
pub fn find_fragment_matches_in_files(
    files: &[PathBuf],
    target: &FragmentTarget,
    config: &FragmentMatchConfig,
) -> Result<Vec<SpectrumMatch>, PipelineError> {
    let per_file = process_files(files, |path| find_matches_in_file(path, target, config))?;
    let matches: Vec<SpectrumMatch> = per_file.into_iter().flatten().collect();

    info!("{} files: {} matching spectra", files.len(), matches.len());
    Ok(matches)
}

/// Match a fragment ladder against every `.ms2` file of a directory
pub fn find_fragment_matches_in_dir<P: AsRef<Path>>(
    dir: P,
    target: &FragmentTarget,
    config: &FragmentMatchConfig,
) -> Result<Vec<SpectrumMatch>, PipelineError> {
    let files = discover_files(dir, MS2_EXTENSION)?;
    find_fragment_matches_in_files(&files, target, config)
}
