//! TOML configuration file support.
//!
//! Settings can be kept in a config file instead of repeating flags:
//!
//! ```toml
//! # pairfinder.toml
//! [pairs]
//! tolerance_ppm = 10.0
//! rt_tolerance = 1.0
//!
//! [ms2]
//! peptide = "Q(+.98)GCTVTVSDLYAM(-48.00)NLEPR"
//! tolerance = 0.02
//! min_matching_peaks = 5
//! ```
//!
//! Explicit command-line flags take precedence over the file, which takes
//! precedence over built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use pairfinder::fragments::FragmentMatchConfig;
use pairfinder::pipeline::PairFinderConfig;

/// Default target peptide for the ms2 command
pub const DEFAULT_PEPTIDE: &str = "Q(+.98)GCTVTVSDLYAM(-48.00)NLEPR";

/// Root configuration structure for pairfinder.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings for the pairs command.
    #[serde(default)]
    pub pairs: PairsConfig,

    /// Settings for the ms2 command.
    #[serde(default)]
    pub ms2: Ms2Config,
}

/// Configuration for the pairs command.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairsConfig {
    /// Mass error tolerance in ppm.
    pub tolerance_ppm: Option<f64>,

    /// Relative intensity threshold (percent of base peak).
    pub relative_intensity_threshold: Option<f64>,

    /// Retention time tolerance in minutes.
    pub rt_tolerance: Option<f64>,

    /// Label mass difference in Da.
    pub label_mass_diff: Option<f64>,

    /// Isotope envelope similarity threshold.
    pub similarity_threshold: Option<f64>,
}

/// Configuration for the ms2 command.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ms2Config {
    /// Target peptide sequence.
    pub peptide: Option<String>,

    /// Fragment ion series.
    pub ion_type: Option<String>,

    /// Fragment tolerance.
    pub tolerance: Option<f64>,

    /// Interpret the tolerance as ppm.
    pub tolerance_is_ppm: Option<bool>,

    /// Relative intensity threshold for matched fragments.
    pub relative_intensity_threshold: Option<f64>,

    /// Minimum number of matched fragments.
    pub min_matching_peaks: Option<usize>,

    /// Most intense matched fragment must exceed this.
    pub max_matching_intensity_threshold: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when a path was given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

impl PairsConfig {
    /// Overlay `flags` on top of these settings.
    pub fn merge(self, flags: PairsConfig) -> Self {
        Self {
            tolerance_ppm: flags.tolerance_ppm.or(self.tolerance_ppm),
            relative_intensity_threshold: flags
                .relative_intensity_threshold
                .or(self.relative_intensity_threshold),
            rt_tolerance: flags.rt_tolerance.or(self.rt_tolerance),
            label_mass_diff: flags.label_mass_diff.or(self.label_mass_diff),
            similarity_threshold: flags.similarity_threshold.or(self.similarity_threshold),
        }
    }

    /// Resolve against the library defaults.
    pub fn resolve(&self) -> PairFinderConfig {
        let defaults = PairFinderConfig::default();
        PairFinderConfig {
            tolerance_ppm: self.tolerance_ppm.unwrap_or(defaults.tolerance_ppm),
            relative_intensity_threshold: self
                .relative_intensity_threshold
                .unwrap_or(defaults.relative_intensity_threshold),
            rt_tolerance: self.rt_tolerance.unwrap_or(defaults.rt_tolerance),
            label_mass_diff: self.label_mass_diff.unwrap_or(defaults.label_mass_diff),
            similarity_threshold: self
                .similarity_threshold
                .unwrap_or(defaults.similarity_threshold),
        }
    }
}

impl Ms2Config {
    /// Overlay `flags` on top of these settings.
    pub fn merge(self, flags: Ms2Config) -> Self {
        Self {
            peptide: flags.peptide.or(self.peptide),
            ion_type: flags.ion_type.or(self.ion_type),
            tolerance: flags.tolerance.or(self.tolerance),
            tolerance_is_ppm: flags.tolerance_is_ppm.or(self.tolerance_is_ppm),
            relative_intensity_threshold: flags
                .relative_intensity_threshold
                .or(self.relative_intensity_threshold),
            min_matching_peaks: flags.min_matching_peaks.or(self.min_matching_peaks),
            max_matching_intensity_threshold: flags
                .max_matching_intensity_threshold
                .or(self.max_matching_intensity_threshold),
        }
    }

    /// Target peptide, falling back to the default sequence.
    pub fn peptide(&self) -> &str {
        self.peptide.as_deref().unwrap_or(DEFAULT_PEPTIDE)
    }

    /// Fragment ion series name, falling back to y ions.
    pub fn ion_type(&self) -> &str {
        self.ion_type.as_deref().unwrap_or("y")
    }

    /// Resolve matching parameters against the library defaults.
    pub fn resolve(&self) -> FragmentMatchConfig {
        let defaults = FragmentMatchConfig::default();
        FragmentMatchConfig {
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            tolerance_is_ppm: self.tolerance_is_ppm.unwrap_or(defaults.tolerance_is_ppm),
            relative_intensity_threshold: self
                .relative_intensity_threshold
                .unwrap_or(defaults.relative_intensity_threshold),
            min_matching_peaks: self
                .min_matching_peaks
                .unwrap_or(defaults.min_matching_peaks),
            max_matching_intensity_threshold: self
                .max_matching_intensity_threshold
                .unwrap_or(defaults.max_matching_intensity_threshold),
        }
    }
}
