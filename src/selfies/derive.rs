//! The bonding-capacity state machine that turns classified symbols into a
//! molecular graph.
//!
//! The walk keeps one piece of state per scope: how many more bond orders the
//! most recently placed atom can still give out. `None` means the scope has
//! ended and the rest of its symbols are skipped. Branches open a nested
//! scope over a fixed number of following symbols; rings are only recorded
//! here and turned into bonds by [`resolve_rings`](super::rings::resolve_rings).

use std::ops::Range;

use log::trace;
use petgraph::graph::NodeIndex;

use crate::bond::BondStereo;
use crate::mol::Mol;
use crate::selfies::alphabet::IndexAlphabet;
use crate::selfies::error::DecodeError;
use crate::selfies::symbol::Symbol;

/// Remaining bond-making capacity of the current scope.
pub type State = Option<u8>;

/// A window over the symbol stream: where the next symbol is and how many
/// symbols are left in the current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub pos: usize,
    pub remaining: usize,
}

impl Cursor {
    /// A cursor over a whole stream of `len` symbols.
    pub fn new(len: usize) -> Cursor {
        Cursor {
            pos: 0,
            remaining: len,
        }
    }

    pub fn is_exhausted(self) -> bool {
        self.remaining == 0
    }

    /// Position one past the last symbol of this scope.
    pub fn end(self) -> usize {
        self.pos + self.remaining
    }

    /// Consume up to `n` symbols and return their positions.
    pub fn advance(&mut self, n: usize) -> Range<usize> {
        let take = n.min(self.remaining);
        let range = self.pos..self.pos + take;
        self.pos += take;
        self.remaining -= take;
        range
    }

    /// Split into the next `n` symbols (clipped to this scope) and whatever
    /// follows them.
    pub fn split(self, n: usize) -> (Cursor, Cursor) {
        let take = n.min(self.remaining);
        let head = Cursor {
            pos: self.pos,
            remaining: take,
        };
        let tail = Cursor {
            pos: self.pos + take,
            remaining: self.remaining - take,
        };
        (head, tail)
    }
}

/// A ring bond requested during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingRecord {
    pub source: NodeIndex,
    /// Requested order, before clamping to free valence.
    pub order: u8,
    /// How many atoms back from `source` the partner sits.
    pub distance: usize,
    pub stereo: BondStereo,
}

/// Output of one derivation walk.
#[derive(Debug)]
pub struct Derived {
    pub mol: Mol,
    pub rings: Vec<RingRecord>,
}

/// Run the state machine over one fragment.
///
/// `texts` and `symbols` are parallel: the classified form drives the walk,
/// the raw text is what index digits are read from.
pub fn derive(texts: &[&str], symbols: &[Symbol]) -> Result<Derived, DecodeError> {
    debug_assert_eq!(texts.len(), symbols.len());
    let mut walk = Walk {
        texts,
        symbols,
        mol: Mol::new(),
        rings: Vec::new(),
    };
    walk.scope(Cursor::new(symbols.len()), Some(0), None)?;
    Ok(Derived {
        mol: walk.mol,
        rings: walk.rings,
    })
}

fn nonzero(n: u8) -> State {
    (n > 0).then_some(n)
}

struct Walk<'a> {
    texts: &'a [&'a str],
    symbols: &'a [Symbol],
    mol: Mol,
    rings: Vec<RingRecord>,
}

impl Walk<'_> {
    /// Derive the symbols under `cursor`, starting from `state` with `prev`
    /// as the atom new bonds attach to. Returns the cursor at the point the
    /// scope stopped, which is before the end of the window when the state
    /// ran out early.
    fn scope(
        &mut self,
        mut cursor: Cursor,
        mut state: State,
        mut prev: Option<NodeIndex>,
    ) -> Result<Cursor, DecodeError> {
        let symbols = self.symbols;
        while let Some(s) = state {
            if cursor.is_exhausted() {
                break;
            }
            let pos = cursor.pos;
            cursor.advance(1);

            match &symbols[pos] {
                Symbol::Atom { prefix, atom } => {
                    let request = if s == 0 { 0 } else { prefix.order() };
                    let room = prev.map_or(0, |p| self.mol.free_valence(p));
                    let actual = request.min(s).min(atom.bonding_capacity).min(room);
                    let capacity = atom.bonding_capacity;

                    let idx = self.mol.add_atom(atom.clone());
                    match prev {
                        Some(p) if actual > 0 => {
                            self.mol.connect(p, idx, actual, prefix.stereo(), false);
                        }
                        _ if s == 0 => self.mol.add_root(idx),
                        _ => {}
                    }

                    state = nonzero(capacity - actual);
                    prev = Some(idx);
                }
                Symbol::Branch { depth, .. } => {
                    if s <= 1 {
                        trace!("branch at {pos} skipped, state {s}");
                        continue;
                    }
                    let initial = (s - 1).min(*depth);
                    let length = self.read_index(&mut cursor, *depth) + 1;
                    let (body, rest) = cursor.split(length);
                    let stopped = self.scope(body, Some(initial), prev)?;
                    if stopped.pos < body.end() {
                        trace!(
                            "branch at {pos} ended early, skipping {} symbols",
                            body.end() - stopped.pos
                        );
                    }
                    cursor = rest;
                    state = Some(s - initial);
                }
                Symbol::Ring { prefix, depth } => {
                    let distance = self.read_index(&mut cursor, *depth);
                    match prev {
                        Some(source) if distance > 0 && s > 0 => {
                            let order = (*depth).min(s);
                            self.rings.push(RingRecord {
                                source,
                                order,
                                distance: distance + 1,
                                stereo: prefix.stereo(),
                            });
                            state = nonzero(s - order);
                        }
                        _ => trace!("ring at {pos} records nothing"),
                    }
                }
                Symbol::Epsilon => {
                    state = if s == 0 { Some(0) } else { None };
                }
                Symbol::Unknown => {
                    return Err(DecodeError::InvalidSymbol {
                        symbol: self.texts[pos].to_string(),
                    });
                }
            }
        }
        Ok(cursor)
    }

    fn read_index(&self, cursor: &mut Cursor, digits: u8) -> usize {
        let range = cursor.advance(usize::from(digits));
        IndexAlphabet.decode(self.texts[range].iter().copied())
    }
}
