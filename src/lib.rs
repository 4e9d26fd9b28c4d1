//! # pairfinder - Isotope-Labeled Precursor Pair Finding
//!
//! `pairfinder` reads MS1/MS2 scan-tagged text files (`.ms1` / `.ms2`) and
//! finds precursors that carry a chemical isotope label: in MS1 such a
//! precursor shows up as two similar isotope envelopes separated by the
//! label mass divided by the charge.
//!
//! ## Key Features
//!
//! - **Streaming parser**: spectra are read one at a time from any `BufRead`
//!   source with typed, line-numbered format errors.
//! - **Pair detection**: charge 3 and 2 hypotheses with isotope envelope
//!   similarity scoring.
//! - **Cross-scan grouping**: duplicate observations are merged and isotope
//!   harmonics removed per source file.
//! - **Targeted MS2 search**: peptide fragment ladders matched against MS2
//!   spectra.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairfinder::pipeline::{find_pairs_in_dir, PairFinderConfig};
//! use pairfinder::report::write_pairs_file;
//!
//! let groups = find_pairs_in_dir("data/", &PairFinderConfig::default())?;
//! write_pairs_file("data/PairFinderResult.csv", &groups)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Streaming a single file:
//!
//! ```rust,no_run
//! use pairfinder::msn::MsnStreamer;
//!
//! let mut streamer = MsnStreamer::open("run.ms1")?;
//! while let Some(spectrum) = streamer.next_spectrum()? {
//!     println!("{} ({} peaks)", spectrum, spectrum.len());
//! }
//! # Ok::<(), pairfinder::msn::MsnError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`msn`]: streaming MS1/MS2 text parser
//! - [`spectrum`]: immutable spectrum model and builder
//! - [`locator`]: tolerance-aware nearest peak lookup
//! - [`pairing`]: isotope pair detector
//! - [`features`]: per-spectrum precursor feature extraction
//! - [`grouping`]: cross-scan merging and harmonic removal
//! - [`peptide`]: peptide sequences and fragment ladders
//! - [`fragments`]: targeted MS2 fragment matching
//! - [`pipeline`]: directory-level drivers
//! - [`report`]: CSV output

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod constants;
pub mod features;
pub mod fragments;
pub mod grouping;
pub mod locator;
pub mod msn;
pub mod pairing;
pub mod peptide;
pub mod pipeline;
pub mod report;
pub mod spectrum;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::features::{extract_features, ExtractionParams, PrecursorFeature};
    pub use crate::fragments::{
        match_fragments, FragmentMatch, FragmentMatchConfig, FragmentTarget, SpectrumMatch,
    };
    pub use crate::grouping::{group_features, FeatureGroups, GroupingParams};
    pub use crate::locator::{locate, Tolerance};
    pub use crate::msn::{MsnError, MsnStreamer, MsnSummary, SpectrumIterator};
    pub use crate::pairing::{detect_pair_charge, PairingParams};
    pub use crate::peptide::{IonType, Peptide, PeptideError};
    pub use crate::pipeline::{PairFinderConfig, PipelineError};
    pub use crate::report::ReportError;
    pub use crate::spectrum::{Peak, Precursor, Spectrum, SpectrumBuilder};
}
