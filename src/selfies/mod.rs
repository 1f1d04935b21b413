//! Decoding of bracketed SELFIES strings into molecular graphs and SMILES.
//!
//! The pipeline for each `.`-separated fragment is: tokenize, classify every
//! symbol, run the derivation state machine, turn ring records into bonds,
//! optionally kekulize, and write SMILES. Every stage works on the one graph
//! owned by the call; nothing is shared between calls apart from the
//! read-only index alphabet.

pub mod alphabet;
pub mod derive;
mod error;
pub mod rings;
pub mod symbol;
pub mod tokenizer;

use log::debug;

use crate::kekulize::kekulize;
use crate::mol::Mol;
use crate::smiles::to_smiles;

pub use alphabet::IndexAlphabet;
pub use derive::{derive, Cursor, Derived, RingRecord};
pub use error::DecodeError;
pub use rings::resolve_rings;
pub use symbol::{classify, BondPrefix, Symbol};
pub use tokenizer::{split_symbols, symbol_count, tokenize, Token};

/// Options for a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Replace aromatic bonds with alternating single and double bonds
    /// before writing. When off, lower-case atoms and aromatic bonds are
    /// written as they were derived.
    pub kekulize: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig { kekulize: true }
    }
}

/// SELFIES to SMILES decoder.
///
/// Holds only its configuration, so one decoder can be shared freely across
/// threads.
///
/// # Examples
///
/// ```
/// use selfcrab::{Decoder, DecoderConfig};
///
/// let decoder = Decoder::new(DecoderConfig { kekulize: false });
/// assert_eq!(decoder.decode("[C][Branch1][C][O][C]").unwrap(), "C(O)C");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Decoder { config }
    }

    /// Decode `input` to SMILES.
    ///
    /// The input is split on `.` and each non-empty fragment is decoded on
    /// its own; the results are joined with `.` in input order, leaving out
    /// fragments that produced no atoms. The first failing fragment fails
    /// the whole call.
    pub fn decode(&self, input: &str) -> Result<String, DecodeError> {
        let mut parts = Vec::new();
        let mut offset = 0;
        for fragment in input.split('.') {
            let start = offset;
            offset += fragment.len() + 1;
            if fragment.is_empty() {
                continue;
            }
            let mol = decode_fragment(fragment, &self.config).map_err(|err| match err {
                DecodeError::UnclosedBracket { pos } => {
                    DecodeError::UnclosedBracket { pos: start + pos }
                }
                other => other,
            })?;
            let smiles = to_smiles(&mol);
            if !smiles.is_empty() {
                parts.push(smiles);
            }
        }
        Ok(parts.join("."))
    }
}

/// Decode `input` to SMILES with the default configuration.
///
/// ```
/// assert_eq!(selfcrab::decode("[C][C][O]").unwrap(), "CCO");
/// assert_eq!(selfcrab::decode("").unwrap(), "");
/// ```
pub fn decode(input: &str) -> Result<String, DecodeError> {
    Decoder::default().decode(input)
}

/// Build the graph for a single fragment. Separators in `fragment` are
/// ignored, so the whole string is treated as one fragment.
pub fn decode_fragment(fragment: &str, config: &DecoderConfig) -> Result<Mol, DecodeError> {
    let texts: Vec<&str> = tokenize(fragment)?
        .into_iter()
        .filter_map(|token| match token {
            Token::Symbol { text, .. } => Some(text),
            Token::Dot(_) => None,
        })
        .collect();
    let symbols = texts
        .iter()
        .map(|text| match classify(text)? {
            // rejected up front, whether or not the walk would reach it
            Symbol::Unknown => Err(DecodeError::InvalidSymbol {
                symbol: text.to_string(),
            }),
            symbol => Ok(symbol),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Derived { mut mol, rings } = derive(&texts, &symbols)?;
    resolve_rings(&mut mol, &rings);
    if config.kekulize {
        kekulize(&mut mol);
    }

    debug!(
        "decoded fragment: {} symbols, {} atoms, {} bonds",
        texts.len(),
        mol.atom_count(),
        mol.bond_count()
    );
    Ok(mol)
}
