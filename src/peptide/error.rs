use thiserror::Error;

/// Errors raised while parsing peptide sequences and ion types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeptideError {
    /// Sequence contained no residues
    #[error("Empty peptide sequence")]
    Empty,

    /// Character is not one of the 20 standard residue codes
    #[error("Unknown residue '{residue}' at position {position}")]
    UnknownResidue {
        /// Offending character
        residue: char,
        /// 0-based character offset in the sequence
        position: usize,
    },

    /// Modification block could not be parsed
    #[error("Invalid modification '{text}' at position {position}")]
    InvalidModification {
        /// Text of the block, parentheses included
        text: String,
        /// 0-based character offset of the opening parenthesis
        position: usize,
    },

    /// Ion type name was not recognized
    #[error("Unknown ion type: {0}")]
    UnknownIonType(String),
}
