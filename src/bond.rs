/// Bond order. `Aromatic` is the unresolved 1.5 order removed by
/// [`kekulize`](crate::kekulize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BondOrder {
    #[default]
    Single,
    Aromatic,
    Double,
    Triple,
}

impl BondOrder {
    /// Whole-number order produced by the derivation state machine.
    pub fn from_count(n: u8) -> Option<BondOrder> {
        match n {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            _ => None,
        }
    }

    /// Order in half-bond units, so that 1.5 is exact.
    pub fn half_units(self) -> u16 {
        match self {
            BondOrder::Single => 2,
            BondOrder::Aromatic => 3,
            BondOrder::Double => 4,
            BondOrder::Triple => 6,
        }
    }
}

/// Directional marker on a single bond, written as `/` or `\`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Up,
    Down,
}

impl BondStereo {
    pub fn as_char(self) -> Option<char> {
        match self {
            BondStereo::None => None,
            BondStereo::Up => Some('/'),
            BondStereo::Down => Some('\\'),
        }
    }
}

/// One directed bond record. Source and destination are the endpoints of
/// the graph edge that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
    pub is_ring: bool,
}
