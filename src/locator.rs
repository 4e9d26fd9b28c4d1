//! Tolerance-aware nearest-peak lookup.
//!
//! Every matcher in the crate goes through [`locate`], so the tie-breaking
//! and window rules below are shared by pair detection, feature extraction
//! and fragment matching alike.

use crate::spectrum::Peak;

/// Mass error tolerance, either absolute (Da) or relative (parts per million)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// Absolute window in Da
    Absolute(f64),
    /// Window in parts per million of the target m/z
    Ppm(f64),
}

impl Tolerance {
    /// Build a tolerance from a value and a unit flag
    pub fn new(value: f64, is_ppm: bool) -> Self {
        if is_ppm {
            Tolerance::Ppm(value)
        } else {
            Tolerance::Absolute(value)
        }
    }

    /// Absolute half-width of the window around `target_mz`
    #[inline]
    pub fn window(&self, target_mz: f64) -> f64 {
        match *self {
            Tolerance::Absolute(da) => da,
            Tolerance::Ppm(ppm) => target_mz * ppm / 1e6,
        }
    }

    /// True when `observed` lies within the window around `target_mz`
    #[inline]
    pub fn contains(&self, target_mz: f64, observed: f64) -> bool {
        (observed - target_mz).abs() <= self.window(target_mz)
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tolerance::Absolute(da) => write!(f, "{} Da", da),
            Tolerance::Ppm(ppm) => write!(f, "{} ppm", ppm),
        }
    }
}

/// Find the index of the peak closest to `target_mz` within `tolerance`.
///
/// `peaks` must be sorted ascending by m/z. An exact hit is returned as-is.
/// Otherwise the two neighbours of the insertion point are compared and the
/// one with the strictly smaller error wins, ties going to the lower index.
/// Returns `None` when no neighbour lies within the window.
pub fn locate(peaks: &[Peak], target_mz: f64, tolerance: Tolerance) -> Option<usize> {
    if peaks.is_empty() {
        return None;
    }

    let window = tolerance.window(target_mz);
    let pos = match peaks.binary_search_by(|p| p.mz.total_cmp(&target_mz)) {
        Ok(idx) => return Some(idx),
        Err(pos) => pos,
    };

    let within = |idx: usize| {
        let err = (target_mz - peaks[idx].mz).abs();
        (err <= window).then_some(err)
    };

    if pos == 0 {
        return within(0).map(|_| 0);
    }
    if pos == peaks.len() {
        return within(pos - 1).map(|_| pos - 1);
    }

    match (within(pos - 1), within(pos)) {
        (Some(lower), Some(upper)) => {
            if upper < lower {
                Some(pos)
            } else {
                Some(pos - 1)
            }
        }
        (Some(_), None) => Some(pos - 1),
        (None, Some(_)) => Some(pos),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks(mzs: &[f64]) -> Vec<Peak> {
        mzs.iter().map(|&mz| Peak::new(mz, 1.0)).collect()
    }

    #[test]
    fn test_empty_peaks() {
        assert_eq!(locate(&[], 100.0, Tolerance::Absolute(1.0)), None);
    }

    #[test]
    fn test_exact_hit() {
        let p = peaks(&[100.0, 200.0, 300.0]);
        assert_eq!(locate(&p, 200.0, Tolerance::Absolute(0.0)), Some(1));
    }

    #[test]
    fn test_nearest_neighbour() {
        let p = peaks(&[100.0, 200.0, 300.0]);
        assert_eq!(locate(&p, 200.4, Tolerance::Absolute(0.5)), Some(1));
        assert_eq!(locate(&p, 299.8, Tolerance::Absolute(0.5)), Some(2));
        assert_eq!(locate(&p, 250.0, Tolerance::Absolute(0.5)), None);
    }

    #[test]
    fn test_below_first_peak() {
        let p = peaks(&[100.0, 200.0]);
        assert_eq!(locate(&p, 99.9, Tolerance::Absolute(0.2)), Some(0));
        assert_eq!(locate(&p, 99.0, Tolerance::Absolute(0.2)), None);
    }

    #[test]
    fn test_above_last_peak() {
        let p = peaks(&[100.0, 200.0]);
        assert_eq!(locate(&p, 200.1, Tolerance::Absolute(0.2)), Some(1));
        assert_eq!(locate(&p, 201.0, Tolerance::Absolute(0.2)), None);
    }

    #[test]
    fn test_tie_goes_to_lower_index() {
        let p = peaks(&[100.0, 101.0]);
        assert_eq!(locate(&p, 100.5, Tolerance::Absolute(0.5)), Some(0));
    }

    #[test]
    fn test_only_upper_neighbour_in_tolerance() {
        let p = peaks(&[100.0, 100.9]);
        assert_eq!(locate(&p, 100.8, Tolerance::Absolute(0.2)), Some(1));
    }

    #[test]
    fn test_ppm_window() {
        let tol = Tolerance::Ppm(5.0);
        assert!((tol.window(1_000_000.0) - 5.0).abs() < 1e-9);

        let p = peaks(&[500.0, 500.01]);
        // 5 ppm of 500.002 is ~0.0025 Da
        assert_eq!(locate(&p, 500.002, tol), Some(0));
        assert_eq!(locate(&p, 500.005, tol), None);
    }

    #[test]
    fn test_tolerance_new_and_display() {
        assert_eq!(Tolerance::new(5.0, true), Tolerance::Ppm(5.0));
        assert_eq!(Tolerance::new(0.2, false), Tolerance::Absolute(0.2));
        assert_eq!(Tolerance::Ppm(5.0).to_string(), "5 ppm");
        assert_eq!(Tolerance::Absolute(0.2).to_string(), "0.2 Da");
    }
}
