//! Isotope-labeled precursor pair detection.
//!
//! A chemically labeled precursor shows up in MS1 as two isotope envelopes
//! separated by `label_mass_diff / z`. Given an anchor peak, the detector
//! tries charge 3 and then charge 2, looks for the heavy partner, builds
//! three-point envelopes (monoisotopic, +1, +2) for both and accepts the
//! charge when the envelopes are similar enough.

use log::trace;

use crate::constants::{DEFAULT_LABEL_MASS_DIFF, NEUTRON_MASS};
use crate::locator::Tolerance;
use crate::spectrum::Spectrum;

#[cfg(test)]
mod tests;

/// Charge states tried for each anchor, in order
pub const CHARGE_HYPOTHESES: [u8; 2] = [3, 2];

/// Number of isotope peaks compared per envelope
pub const ENVELOPE_SIZE: usize = 3;

/// Parameters for pair detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingParams {
    /// Mass error tolerance in ppm used for every peak lookup
    pub tolerance_ppm: f64,
    /// Mass difference introduced by the isotope label (Da)
    pub label_mass_diff: f64,
    /// Minimum envelope similarity in [0, 1]
    pub similarity_threshold: f64,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            tolerance_ppm: 5.0,
            label_mass_diff: DEFAULT_LABEL_MASS_DIFF,
            similarity_threshold: 0.75,
        }
    }
}

impl PairingParams {
    /// Maximum normalized envelope distance that still counts as a pair
    pub fn max_distance(&self) -> f64 {
        1.0 - self.similarity_threshold
    }

    fn tolerance(&self) -> Tolerance {
        Tolerance::Ppm(self.tolerance_ppm)
    }
}

/// Determine whether the peak at `anchor_idx` is the light member of a
/// labeled pair and return its charge.
///
/// Returns `None` when neither charge hypothesis yields a partner with a
/// complete, similar isotope envelope.
pub fn detect_pair_charge(
    spectrum: &Spectrum,
    anchor_idx: usize,
    params: &PairingParams,
) -> Option<u8> {
    let anchor_mz = spectrum.peaks().get(anchor_idx)?.mz;
    let tolerance = params.tolerance();

    for &charge in CHARGE_HYPOTHESES.iter() {
        let z = f64::from(charge);
        let partner_mz = anchor_mz + params.label_mass_diff / z;
        if spectrum.locate(partner_mz, tolerance).is_none() {
            continue;
        }

        let Some(light) = isotope_envelope(spectrum, anchor_mz, charge, tolerance) else {
            continue;
        };
        let Some(heavy) = isotope_envelope(spectrum, partner_mz, charge, tolerance) else {
            continue;
        };

        let distance = envelope_distance(&light, &heavy);
        trace!(
            "anchor {:.4} z={} partner {:.4} distance {:.4}",
            anchor_mz,
            charge,
            partner_mz,
            distance
        );
        if distance <= params.max_distance() {
            return Some(charge);
        }
    }

    None
}

/// Intensities of the monoisotopic, +1 and +2 peaks of an envelope.
///
/// All-or-nothing: `None` if any of the three peaks is missing.
pub fn isotope_envelope(
    spectrum: &Spectrum,
    mono_mz: f64,
    charge: u8,
    tolerance: Tolerance,
) -> Option<[f64; ENVELOPE_SIZE]> {
    let spacing = NEUTRON_MASS / f64::from(charge);
    let peaks = spectrum.peaks();
    let mut envelope = [0.0; ENVELOPE_SIZE];
    for (i, slot) in envelope.iter_mut().enumerate() {
        let idx = spectrum.locate(mono_mz + i as f64 * spacing, tolerance)?;
        *slot = peaks[idx].intensity;
    }
    Some(envelope)
}

/// Sum of squares of a vector
pub fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Euclidean distance between two equal-length vectors
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Euclidean distance normalized by the larger of the two vector norms.
///
/// 0.0 means identical envelopes; two all-zero envelopes are identical.
pub fn envelope_distance(a: &[f64], b: &[f64]) -> f64 {
    let denom = squared_norm(a).max(squared_norm(b)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    euclidean_distance(a, b) / denom
}
