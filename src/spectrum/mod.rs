//! Peak and spectrum value types.
//!
//! A [`Spectrum`] owns its peak list, sorted ascending by m/z. The sort is
//! established once by [`SpectrumBuilder::build`] so the locator can binary
//! search without re-checking. Spectra are immutable after construction.

use crate::locator::{self, Tolerance};


/// A single centroided (m/z, intensity) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Peak intensity
    pub intensity: f64,
}

impl Peak {
    /// Create a new peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// Precursor ion information carried by MS2 spectra
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Precursor {
    /// Precursor m/z from the `S` record
    pub mz: f64,
    /// Precursor charge from the `Z` record (0 when unknown)
    pub charge: u8,
    /// Scan number of the MS1 scan the precursor was selected from
    pub precursor_scan: u32,
}

/// One reconstructed scan with its metadata and sorted peak list
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    scan_number: u32,
    ms_level: u8,
    retention_time: f32,
    total_ion_current: f64,
    precursor: Option<Precursor>,
    peaks: Vec<Peak>,
}

impl Spectrum {
    /// Native scan number
    pub fn scan_number(&self) -> u32 {
        self.scan_number
    }

    /// MS level (1 or 2)
    pub fn ms_level(&self) -> u8 {
        self.ms_level
    }

    /// Retention time in minutes
    pub fn retention_time(&self) -> f32 {
        self.retention_time
    }

    /// Total ion current (or precursor intensity for MS2 scans)
    pub fn total_ion_current(&self) -> f64 {
        self.total_ion_current
    }

    /// Precursor information; always present for MS2, never for MS1
    pub fn precursor(&self) -> Option<&Precursor> {
        self.precursor.as_ref()
    }

    /// Peaks sorted ascending by m/z
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True when the scan has no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// m/z values in ascending order
    pub fn mz_array(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.mz).collect()
    }

    /// Intensities in m/z order
    pub fn intensity_array(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// Largest intensity in the scan, 0.0 for an empty scan
    pub fn max_intensity(&self) -> f64 {
        self.peaks
            .iter()
            .map(|p| p.intensity)
            .fold(0.0_f64, f64::max)
    }

    /// Intensities as a percentage of the base peak.
    ///
    /// All zeros when the base peak intensity is not positive.
    pub fn relative_intensities(&self) -> Vec<f64> {
        let max = self.max_intensity();
        if max <= 0.0 {
            return vec![0.0; self.peaks.len()];
        }
        self.peaks
            .iter()
            .map(|p| p.intensity / max * 100.0)
            .collect()
    }

    /// Index of the closest in-tolerance peak, see [`locator::locate`]
    pub fn locate(&self, target_mz: f64, tolerance: Tolerance) -> Option<usize> {
        locator::locate(&self.peaks, target_mz, tolerance)
    }
}

impl std::fmt::Display for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MS{} Spectrum, Scan {}, RT {}",
            self.ms_level, self.scan_number, self.retention_time
        )
    }
}

/// Builder for [`Spectrum`].
///
/// `build` sorts the peaks by m/z and reconciles the MS level with the
/// precursor: setting a precursor implies MS2, and an MS1 spectrum drops any
/// precursor it was given.
#[derive(Debug, Clone)]
pub struct SpectrumBuilder {
    scan_number: u32,
    ms_level: u8,
    retention_time: f32,
    total_ion_current: f64,
    precursor: Option<Precursor>,
    peaks: Vec<Peak>,
}

impl SpectrumBuilder {
    /// Create a new MS1 spectrum builder for the given scan
    pub fn new(scan_number: u32) -> Self {
        Self {
            scan_number,
            ms_level: 1,
            retention_time: 0.0,
            total_ion_current: 0.0,
            precursor: None,
            peaks: Vec::new(),
        }
    }

    /// Set the MS level (1 or 2)
    pub fn ms_level(mut self, level: u8) -> Self {
        self.ms_level = level;
        self
    }

    /// Set the retention time in minutes
    pub fn retention_time(mut self, rt: f32) -> Self {
        self.retention_time = rt;
        self
    }

    /// Set the total ion current
    pub fn total_ion_current(mut self, tic: f64) -> Self {
        self.total_ion_current = tic;
        self
    }

    /// Set precursor information, promoting the spectrum to MS2
    pub fn precursor(mut self, mz: f64, charge: u8, precursor_scan: u32) -> Self {
        self.precursor = Some(Precursor {
            mz,
            charge,
            precursor_scan,
        });
        self.ms_level = 2;
        self
    }

    /// Set all peaks at once
    pub fn peaks(mut self, peaks: Vec<Peak>) -> Self {
        self.peaks = peaks;
        self
    }

    /// Add a single peak
    pub fn add_peak(mut self, mz: f64, intensity: f64) -> Self {
        self.peaks.push(Peak::new(mz, intensity));
        self
    }

    /// Build the spectrum
    pub fn build(self) -> Spectrum {
        let mut peaks = self.peaks;
        if !peaks.windows(2).all(|w| w[0].mz <= w[1].mz) {
            peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        }

        let precursor = if self.ms_level >= 2 {
            Some(self.precursor.unwrap_or_default())
        } else {
            None
        };

        Spectrum {
            scan_number: self.scan_number,
            ms_level: self.ms_level,
            retention_time: self.retention_time,
            total_ion_current: self.total_ion_current,
            precursor,
            peaks,
        }
    }
}
