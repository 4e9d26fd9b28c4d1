//! Targeted fragment matching in MS2 spectra.
//!
//! Looks up a precomputed fragment ladder (usually y ions of a peptide) in
//! each MS2 spectrum and keeps the spectra where enough fragments are found
//! with sufficient relative intensity.

use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::constants::PROTON_MASS;
use crate::locator::Tolerance;
use crate::msn::{MsnError, MsnStreamer};
use crate::peptide::{IonType, Peptide};
use crate::spectrum::Spectrum;


/// Configuration for fragment matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentMatchConfig {
    /// Fragment m/z tolerance (Da, or ppm when `tolerance_is_ppm`)
    pub tolerance: f64,
    /// Interpret `tolerance` as ppm
    pub tolerance_is_ppm: bool,
    /// Minimum relative intensity (0-100) for a located peak to count
    pub relative_intensity_threshold: f64,
    /// Minimum number of matched fragments
    pub min_matching_peaks: usize,
    /// The most intense matched fragment must exceed this relative intensity
    pub max_matching_intensity_threshold: f64,
}

impl Default for FragmentMatchConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.2,
            tolerance_is_ppm: false,
            relative_intensity_threshold: 2.0,
            min_matching_peaks: 4,
            max_matching_intensity_threshold: 2.0,
        }
    }
}

impl FragmentMatchConfig {
    /// Tolerance as a locator window
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance, self.tolerance_is_ppm)
    }
}

/// Result of matching one fragment ladder against one spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentMatch {
    /// Peak index per fragment, `None` when not matched
    pub peak_indices: Vec<Option<usize>>,
    /// Relative intensity per fragment, 0 when not matched
    pub relative_intensities: Vec<f64>,
    /// Number of matched fragments
    pub num_matched: usize,
    /// Largest matched relative intensity
    pub max_matched_intensity: f64,
}

impl FragmentMatch {
    /// Sum of matched relative intensities
    pub fn total_matched_intensity(&self) -> f64 {
        self.relative_intensities.iter().sum()
    }

    /// True when the spectrum passes both match thresholds
    pub fn qualifies(&self, config: &FragmentMatchConfig) -> bool {
        self.num_matched >= config.min_matching_peaks
            && self.max_matched_intensity > config.max_matching_intensity_threshold
    }
}

/// Locate each fragment m/z in a spectrum.
///
/// A located peak only counts when its intensity relative to the base peak
/// reaches the configured threshold.
pub fn match_fragments(
    spectrum: &Spectrum,
    fragment_mzs: &[f64],
    config: &FragmentMatchConfig,
) -> FragmentMatch {
    let tolerance = config.tolerance();
    let relative = spectrum.relative_intensities();

    let mut result = FragmentMatch {
        peak_indices: vec![None; fragment_mzs.len()],
        relative_intensities: vec![0.0; fragment_mzs.len()],
        num_matched: 0,
        max_matched_intensity: 0.0,
    };

    for (i, &mz) in fragment_mzs.iter().enumerate() {
        let Some(idx) = spectrum.locate(mz, tolerance) else {
            continue;
        };
        let rel = relative[idx];
        if rel < config.relative_intensity_threshold {
            continue;
        }
        result.peak_indices[i] = Some(idx);
        result.relative_intensities[i] = rel;
        result.num_matched += 1;
        result.max_matched_intensity = result.max_matched_intensity.max(rel);
    }

    result
}

/// One MS2 spectrum that matched the target fragment ladder
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumMatch {
    /// File the spectrum came from
    pub source_file: String,
    /// Scan number
    pub scan_number: u32,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Precursor charge
    pub precursor_charge: u8,
    /// Precursor intensity from the scan annotations
    pub precursor_intensity: f64,
    /// Precursor `[M+H]+`
    pub precursor_mh: f64,
    /// Retention time in minutes
    pub retention_time: f32,
    /// Per-fragment match details
    pub fragments: FragmentMatch,
    /// Precursor `[M+H]+` minus the peptide `[M+H]+`
    pub mass_diff: f64,
}

/// Target peptide with its precomputed fragment ladder
#[derive(Debug, Clone)]
pub struct FragmentTarget {
    /// The peptide being searched for
    pub peptide: Peptide,
    /// Ion series of the ladder
    pub ion_type: IonType,
    /// Singly charged fragment m/z values
    pub fragment_mzs: Vec<f64>,
}

impl FragmentTarget {
    /// Build a target from a peptide and an ion series
    pub fn new(peptide: Peptide, ion_type: IonType) -> Self {
        let fragment_mzs = peptide.fragment_masses(ion_type);
        Self {
            peptide,
            ion_type,
            fragment_mzs,
        }
    }

    /// Match one spectrum, returning a row when it qualifies
    pub fn match_spectrum(
        &self,
        spectrum: &Spectrum,
        source_file: &str,
        config: &FragmentMatchConfig,
    ) -> Option<SpectrumMatch> {
        let fragments = match_fragments(spectrum, &self.fragment_mzs, config);
        if !fragments.qualifies(config) {
            return None;
        }

        let precursor = spectrum.precursor().copied().unwrap_or_default();
        let precursor_mh = precursor_mh(precursor.mz, precursor.charge);
        Some(SpectrumMatch {
            source_file: source_file.to_string(),
            scan_number: spectrum.scan_number(),
            precursor_mz: precursor.mz,
            precursor_charge: precursor.charge,
            precursor_intensity: spectrum.total_ion_current(),
            precursor_mh,
            retention_time: spectrum.retention_time(),
            fragments,
            mass_diff: precursor_mh - self.peptide.mh_mass(),
        })
    }
}

/// `[M+H]+` of a precursor observed at `mz` with charge `z`
pub fn precursor_mh(mz: f64, charge: u8) -> f64 {
    (mz - PROTON_MASS) * f64::from(charge) + PROTON_MASS
}

/// Match every spectrum of a stream against the target
pub fn find_matches<R: BufRead>(
    streamer: MsnStreamer<R>,
    target: &FragmentTarget,
    config: &FragmentMatchConfig,
) -> Result<Vec<SpectrumMatch>, MsnError> {
    let source_file = streamer.source_name().to_string();
    let mut matches = Vec::new();
    let mut num_spectra = 0usize;

    for spectrum in streamer.spectra() {
        let spectrum = spectrum?;
        num_spectra += 1;
        if let Some(m) = target.match_spectrum(&spectrum, &source_file, config) {
            matches.push(m);
        }
    }

    debug!(
        "{}: {} of {} spectra matched",
        source_file,
        matches.len(),
        num_spectra
    );
    Ok(matches)
}

/// Open an MS2 file and match its spectra against the target
pub fn find_matches_in_file<P: AsRef<Path>>(
    path: P,
    target: &FragmentTarget,
    config: &FragmentMatchConfig,
) -> Result<Vec<SpectrumMatch>, MsnError> {
    find_matches(MsnStreamer::open(path)?, target, config)
}
