use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::spectrum::Spectrum;

/// Summary statistics gathered in one streaming pass over an MS1/MS2 file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MsnSummary {
    /// Number of spectra
    pub num_spectra: usize,
    /// Number of MS1 spectra
    pub num_ms1_spectra: usize,
    /// Number of MS2 spectra
    pub num_ms2_spectra: usize,
    /// Total number of peaks
    pub total_peaks: usize,
    /// Retention time range (min, max) in minutes
    pub rt_range: Option<(f32, f32)>,
    /// Precursor m/z range (min, max) over MS2 spectra
    pub precursor_mz_range: Option<(f64, f64)>,
}

impl MsnSummary {
    /// Fold one spectrum into the running statistics
    pub fn record(&mut self, spectrum: &Spectrum) {
        self.num_spectra += 1;
        match spectrum.ms_level() {
            1 => self.num_ms1_spectra += 1,
            _ => self.num_ms2_spectra += 1,
        }
        self.total_peaks += spectrum.len();

        let rt = spectrum.retention_time();
        self.rt_range = Some(match self.rt_range {
            Some((lo, hi)) => (lo.min(rt), hi.max(rt)),
            None => (rt, rt),
        });

        if let Some(precursor) = spectrum.precursor() {
            let mz = precursor.mz;
            self.precursor_mz_range = Some(match self.precursor_mz_range {
                Some((lo, hi)) => (lo.min(mz), hi.max(mz)),
                None => (mz, mz),
            });
        }
    }

    /// Mean number of peaks per spectrum
    pub fn mean_peaks_per_spectrum(&self) -> f64 {
        if self.num_spectra == 0 {
            0.0
        } else {
            self.total_peaks as f64 / self.num_spectra as f64
        }
    }
}

impl MsnSummary {
    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!(
                "{}: {} ({} MS1, {} MS2)\n",
                style("Total spectra").bold(),
                style(self.num_spectra).cyan(),
                style(self.num_ms1_spectra).green(),
                style(self.num_ms2_spectra).yellow()
            ));
            output.push_str(&format!(
                "{}: {} ({:.1} per spectrum)\n",
                style("Total peaks").bold(),
                style(self.total_peaks).cyan(),
                self.mean_peaks_per_spectrum()
            ));
            if let Some((min_rt, max_rt)) = self.rt_range {
                output.push_str(&format!(
                    "{}: {:.2} - {:.2} min\n",
                    style("RT range").bold(),
                    min_rt,
                    max_rt
                ));
            }
            if let Some((min_mz, max_mz)) = self.precursor_mz_range {
                output.push_str(&format!(
                    "{}: {:.4} - {:.4}\n",
                    style("Precursor m/z range").bold(),
                    min_mz,
                    max_mz
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl<'a> FromIterator<&'a Spectrum> for MsnSummary {
    fn from_iter<I: IntoIterator<Item = &'a Spectrum>>(iter: I) -> Self {
        let mut summary = MsnSummary::default();
        for spectrum in iter {
            summary.record(spectrum);
        }
        summary
    }
}

impl fmt::Display for MsnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total spectra: {}", self.num_spectra)?;
        writeln!(f, "  MS1 spectra: {}", self.num_ms1_spectra)?;
        writeln!(f, "  MS2 spectra: {}", self.num_ms2_spectra)?;
        writeln!(f, "Total peaks: {}", self.total_peaks)?;
        writeln!(
            f,
            "Mean peaks per spectrum: {:.1}",
            self.mean_peaks_per_spectrum()
        )?;
        if let Some((min_rt, max_rt)) = self.rt_range {
            writeln!(f, "RT range: {:.2} - {:.2} min", min_rt, max_rt)?;
        }
        if let Some((min_mz, max_mz)) = self.precursor_mz_range {
            writeln!(f, "Precursor m/z range: {:.4} - {:.4}", min_mz, max_mz)?;
        }
        Ok(())
    }
}
