use thiserror::Error;

/// Errors produced when decoding a SELFIES string.
///
/// Every variant is fatal for the fragment being decoded; no partial output
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A `[` was opened but never closed with `]`.
    #[error("unclosed bracket starting at position {pos}")]
    UnclosedBracket { pos: usize },
    /// The symbol matches no grammar shape, or names an unknown element.
    #[error("invalid symbol '{symbol}'")]
    InvalidSymbol { symbol: String },
    /// A branch symbol whose depth tag is not 1, 2 or 3.
    #[error("invalid branch type '{symbol}'")]
    InvalidBranchType { symbol: String },
    /// A ring symbol whose depth tag is not 1, 2 or 3.
    #[error("invalid ring type '{symbol}'")]
    InvalidRingType { symbol: String },
    /// The explicit hydrogens exceed what the element can carry at its charge.
    #[error("atom symbol '{symbol}' has a negative bonding capacity")]
    NegativeBondingCapacity { symbol: String },
}
