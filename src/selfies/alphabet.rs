//! The index alphabet: symbols that double as base-16 digits.
//!
//! Branch lengths and ring distances are written with ordinary symbols. A
//! symbol's position in [`INDEX_SYMBOLS`] is its digit value, and a run of
//! symbols is read most significant first.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const INDEX_SYMBOLS: [&str; 16] = [
    "[C]",
    "[Ring1]",
    "[Ring2]",
    "[Branch1]",
    "[=Branch1]",
    "[#Branch1]",
    "[Branch2]",
    "[=Branch2]",
    "[#Branch2]",
    "[O]",
    "[N]",
    "[=N]",
    "[=C]",
    "[#C]",
    "[S]",
    "[P]",
];

static INDEX_CODES: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    INDEX_SYMBOLS
        .iter()
        .enumerate()
        .map(|(code, &sym)| (sym, code))
        .collect()
});

/// Read-only handle on the process-wide index alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexAlphabet;

impl IndexAlphabet {
    /// Number of symbols in the alphabet, which is also the numeric base.
    pub fn base(self) -> usize {
        INDEX_SYMBOLS.len()
    }

    /// Digit value of `symbol`. Symbols outside the alphabet read as 0.
    pub fn code_of(self, symbol: &str) -> usize {
        INDEX_CODES.get(symbol).copied().unwrap_or(0)
    }

    /// Value of a run of digit symbols, last symbol least significant.
    /// An empty run is 0.
    pub fn decode<'a, I>(self, run: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        run.into_iter().fold(0usize, |acc, sym| {
            acc.saturating_mul(self.base())
                .saturating_add(self.code_of(sym))
        })
    }

    /// The `digits` symbols that encode `value`, most significant first.
    /// Returns `None` if `value` does not fit in that many digits.
    pub fn encode(self, value: usize, digits: usize) -> Option<Vec<&'static str>> {
        let mut out = vec![INDEX_SYMBOLS[0]; digits];
        let mut rest = value;
        for slot in out.iter_mut().rev() {
            *slot = INDEX_SYMBOLS[rest % self.base()];
            rest /= self.base();
        }
        if rest != 0 {
            return None;
        }
        Some(out)
    }
}
