//! Peptide sequences and fragment ion ladders.
//!
//! Sequences use one-letter residue codes with optional inline mass
//! modifications, e.g. `Q(+.98)GCTVTVSDLYAM(-48.00)NLEPR`. A residue may
//! carry several stacked modifications (`M(+15.99)(+1.00)`), which are
//! summed. Cysteine is carbamidomethylated.

use std::fmt;
use std::str::FromStr;

use crate::constants::{H2O_MASS, PROTON_MASS};

pub use error::PeptideError;

mod error;


/// Monoisotopic residue masses, indexed by [`RESIDUE_CODES`]
const RESIDUE_MASSES: [f64; 20] = [
    71.03711,  // A
    156.10111, // R
    114.04293, // N
    115.02694, // D
    160.03065, // C (carbamidomethyl)
    129.04259, // E
    128.05858, // Q
    57.02146,  // G
    137.05891, // H
    113.08406, // I
    113.08406, // L
    128.09496, // K
    131.04049, // M
    147.06841, // F
    97.05276,  // P
    87.03203,  // S
    101.04768, // T
    186.07931, // W
    163.06333, // Y
    99.06841,  // V
];

/// One-letter codes of the supported residues
pub const RESIDUE_CODES: &str = "ARNDCEQGHILKMFPSTWYV";

/// Monoisotopic mass of an unmodified residue
pub fn residue_mass(code: char) -> Option<f64> {
    RESIDUE_CODES
        .find(code)
        .map(|idx| RESIDUE_MASSES[idx])
}

/// Fragment ion series with their mass shift relative to the residue sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonType {
    /// a ions
    A,
    /// b ions
    B,
    /// y ions
    Y,
    /// b ions minus water
    BWaterLoss,
    /// b ions minus ammonia
    BAmmoniaLoss,
    /// y ions minus water
    YWaterLoss,
    /// y ions minus ammonia
    YAmmoniaLoss,
}

impl IonType {
    /// All supported ion types
    pub const ALL: [IonType; 7] = [
        IonType::A,
        IonType::B,
        IonType::Y,
        IonType::BWaterLoss,
        IonType::BAmmoniaLoss,
        IonType::YWaterLoss,
        IonType::YAmmoniaLoss,
    ];

    /// Mass added to the residue sum to get the singly charged ion m/z
    pub fn mass_shift(&self) -> f64 {
        match self {
            IonType::A => -26.9871,
            IonType::B => 1.0078,
            IonType::Y => 19.0184,
            IonType::BWaterLoss => -17.00277,
            IonType::BAmmoniaLoss => -16.01875,
            IonType::YWaterLoss => 1.00783,
            IonType::YAmmoniaLoss => 1.99185,
        }
    }

    /// True for series that contain the N-terminus
    pub fn is_n_terminal(&self) -> bool {
        matches!(
            self,
            IonType::A | IonType::B | IonType::BWaterLoss | IonType::BAmmoniaLoss
        )
    }

    /// Short label used in report headers (`y`, `b-H2O`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            IonType::A => "a",
            IonType::B => "b",
            IonType::Y => "y",
            IonType::BWaterLoss => "b-H2O",
            IonType::BAmmoniaLoss => "b-NH3",
            IonType::YWaterLoss => "y-H2O",
            IonType::YAmmoniaLoss => "y-NH3",
        }
    }
}

impl fmt::Display for IonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IonType {
    type Err = PeptideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        IonType::ALL
            .into_iter()
            .find(|ion| ion.label().to_ascii_lowercase() == wanted)
            .ok_or_else(|| PeptideError::UnknownIonType(s.to_string()))
    }
}

/// A residue together with its summed modification mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residue {
    /// One-letter code
    pub code: char,
    /// Total modification mass (0 when unmodified)
    pub modification: f64,
}

impl Residue {
    /// Residue mass including modifications
    pub fn mass(&self) -> f64 {
        residue_mass(self.code).unwrap_or(0.0) + self.modification
    }

    /// True when at least one modification was attached
    pub fn is_modified(&self) -> bool {
        self.modification != 0.0
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if self.is_modified() {
            let rounded = format!("{:.2}", self.modification);
            let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
            if self.modification > 0.0 {
                write!(f, "(+{})", trimmed)?;
            } else {
                write!(f, "({})", trimmed)?;
            }
        }
        Ok(())
    }
}

/// A parsed peptide sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Peptide {
    residues: Vec<Residue>,
    mass: f64,
}

impl Peptide {
    /// Parse a sequence with optional inline modifications
    pub fn parse(sequence: &str) -> Result<Self, PeptideError> {
        let chars: Vec<char> = sequence.trim().chars().collect();
        let mut residues: Vec<Residue> = Vec::with_capacity(chars.len());
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];
            if c == '(' {
                let close = chars[pos..]
                    .iter()
                    .position(|&ch| ch == ')')
                    .map(|offset| pos + offset);
                let text: String = match close {
                    Some(end) => chars[pos..=end].iter().collect(),
                    None => chars[pos..].iter().collect(),
                };
                let invalid = || PeptideError::InvalidModification {
                    text: text.clone(),
                    position: pos,
                };
                let end = close.ok_or_else(invalid)?;
                let residue = residues.last_mut().ok_or_else(invalid)?;
                let delta: f64 = text[1..text.len() - 1]
                    .trim()
                    .parse()
                    .map_err(|_| invalid())?;
                residue.modification += delta;
                pos = end + 1;
                continue;
            }

            if residue_mass(c).is_none() {
                return Err(PeptideError::UnknownResidue {
                    residue: c,
                    position: pos,
                });
            }
            residues.push(Residue {
                code: c,
                modification: 0.0,
            });
            pos += 1;
        }

        if residues.is_empty() {
            return Err(PeptideError::Empty);
        }

        let mass = residues.iter().map(Residue::mass).sum();
        Ok(Self { residues, mass })
    }

    /// Residues in N- to C-terminal order
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Number of residues
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Always false for a successfully parsed peptide
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Sum of residue masses, modifications included
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Singly protonated `[M+H]+` mass
    pub fn mh_mass(&self) -> f64 {
        self.mass + H2O_MASS + PROTON_MASS
    }

    /// Unmodified one-letter sequence
    pub fn base_sequence(&self) -> String {
        self.residues.iter().map(|r| r.code).collect()
    }

    /// Singly charged fragment ladder for one ion series.
    ///
    /// Has `len - 1` entries. Entry `i` is the fragment with `i + 1`
    /// residues counted from the series' terminus, so for y ions the first
    /// entry is the C-terminal residue.
    pub fn fragment_masses(&self, ion_type: IonType) -> Vec<f64> {
        let n = self.residues.len().saturating_sub(1);
        let shift = ion_type.mass_shift();

        let masses: Vec<f64> = if ion_type.is_n_terminal() {
            self.residues.iter().map(Residue::mass).collect()
        } else {
            self.residues.iter().rev().map(Residue::mass).collect()
        };

        masses
            .into_iter()
            .take(n)
            .scan(0.0, |acc, mass| {
                *acc += mass;
                Some(*acc + shift)
            })
            .collect()
    }
}

impl FromStr for Peptide {
    type Err = PeptideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Peptide::parse(s)
    }
}

impl fmt::Display for Peptide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for residue in &self.residues {
            write!(f, "{}", residue)?;
        }
        Ok(())
    }
}
