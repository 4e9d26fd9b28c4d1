//! Precursor feature extraction from MS1 spectra.
//!
//! Walks the peaks of a spectrum in ascending m/z order and runs the pair
//! detector on every peak that is intense enough and is not an isotope
//! satellite of the feature accepted just before it.

use std::cmp::Ordering;
use std::io::BufRead;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::constants::NEUTRON_MASS;
use crate::locator::Tolerance;
use crate::msn::{MsnError, MsnStreamer};
use crate::pairing::{detect_pair_charge, PairingParams};
use crate::spectrum::Spectrum;


/// A confirmed labeled precursor observed in one MS1 scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecursorFeature {
    /// File name the feature was found in
    #[serde(rename = "file")]
    pub source_file: String,
    /// m/z of the light (unlabeled) monoisotopic peak
    #[serde(rename = "m/z")]
    pub mz: f64,
    /// Charge inferred from the pair spacing
    #[serde(rename = "z")]
    pub charge: u8,
    /// Intensity of the light monoisotopic peak
    pub intensity: f64,
    /// Retention time of the scan in minutes
    #[serde(rename = "rt")]
    pub retention_time: f32,
}

impl PrecursorFeature {
    /// Create a new feature
    pub fn new(
        source_file: impl Into<String>,
        mz: f64,
        intensity: f64,
        charge: u8,
        retention_time: f32,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            mz,
            charge,
            intensity,
            retention_time,
        }
    }

    /// Order two features by m/z
    pub fn cmp_mz(&self, other: &Self) -> Ordering {
        self.mz.total_cmp(&other.mz)
    }
}

impl PartialOrd for PrecursorFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.mz.partial_cmp(&other.mz)
    }
}

/// Parameters for feature extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    /// Pair detection parameters (tolerance, label, similarity)
    pub pairing: PairingParams,
    /// Minimum intensity as a percentage (0-100) of the base peak
    pub relative_intensity_threshold: f64,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            pairing: PairingParams::default(),
            relative_intensity_threshold: 2.0,
        }
    }
}

/// Extract labeled precursor features from one spectrum
pub fn extract_features(
    spectrum: &Spectrum,
    source_file: &str,
    params: &ExtractionParams,
) -> Vec<PrecursorFeature> {
    let max_intensity = spectrum.max_intensity();
    if max_intensity <= 0.0 {
        return Vec::new();
    }

    let tolerance = Tolerance::Ppm(params.pairing.tolerance_ppm);
    let mut features = Vec::new();
    // last accepted feature (or its latest isotope), and its charge
    let mut previous: Option<(f64, u8)> = None;

    for (idx, peak) in spectrum.peaks().iter().enumerate() {
        if let Some((prev_mz, prev_charge)) = previous {
            let next_isotope = prev_mz + NEUTRON_MASS / f64::from(prev_charge);
            if (peak.mz - next_isotope).abs() <= tolerance.window(peak.mz) {
                previous = Some((peak.mz, prev_charge));
                continue;
            }
        }

        if peak.intensity / max_intensity * 100.0 < params.relative_intensity_threshold {
            continue;
        }

        if let Some(charge) = detect_pair_charge(spectrum, idx, &params.pairing) {
            features.push(PrecursorFeature::new(
                source_file,
                peak.mz,
                peak.intensity,
                charge,
                spectrum.retention_time(),
            ));
            previous = Some((peak.mz, charge));
        }
    }

    features
}

/// Run feature extraction over every spectrum of a stream
pub fn find_features<R: BufRead>(
    streamer: MsnStreamer<R>,
    params: &ExtractionParams,
) -> Result<Vec<PrecursorFeature>, MsnError> {
    let source_file = streamer.source_name().to_string();
    let mut features = Vec::new();
    let mut num_spectra = 0usize;

    for spectrum in streamer.spectra() {
        let spectrum = spectrum?;
        num_spectra += 1;
        features.extend(extract_features(&spectrum, &source_file, params));
    }

    debug!(
        "{}: {} spectra, {} candidate features",
        source_file,
        num_spectra,
        features.len()
    );
    Ok(features)
}

/// Open an MS1 file and extract its features
pub fn find_features_in_file<P: AsRef<Path>>(
    path: P,
    params: &ExtractionParams,
) -> Result<Vec<PrecursorFeature>, MsnError> {
    find_features(MsnStreamer::open(path)?, params)
}
