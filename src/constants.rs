//! Physical constants used for isotope spacing and fragment masses.

/// Monoisotopic mass of a proton (Da)
pub const PROTON_MASS: f64 = 1.0072;

/// Mass spacing between adjacent isotope peaks (Da)
pub const NEUTRON_MASS: f64 = 1.0032;

/// Monoisotopic mass of water (Da)
pub const H2O_MASS: f64 = 18.01057;

/// Default isotope-label mass difference (Da)
pub const DEFAULT_LABEL_MASS_DIFF: f64 = 6.0138;

/// File extension of MS1 scan files
pub const MS1_EXTENSION: &str = "ms1";

/// File extension of MS2 scan files
pub const MS2_EXTENSION: &str = "ms2";
