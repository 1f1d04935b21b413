use crate::atom::{Atom, Chirality};
use crate::bond::BondStereo;
use crate::element::Element;
use crate::selfies::error::DecodeError;

/// Text of the symbol that ends a derivation scope.
pub const EPSILON: &str = "[epsilon]";

/// Bond marker written in front of an atom, branch or ring symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondPrefix {
    #[default]
    None,
    /// `=`
    Double,
    /// `#`
    Triple,
    /// `/`
    Up,
    /// `\`
    Down,
}

impl BondPrefix {
    fn from_char(c: char) -> Option<BondPrefix> {
        match c {
            '=' => Some(BondPrefix::Double),
            '#' => Some(BondPrefix::Triple),
            '/' => Some(BondPrefix::Up),
            '\\' => Some(BondPrefix::Down),
            _ => None,
        }
    }

    /// Bond order the prefix asks for.
    pub fn order(self) -> u8 {
        match self {
            BondPrefix::None | BondPrefix::Up | BondPrefix::Down => 1,
            BondPrefix::Double => 2,
            BondPrefix::Triple => 3,
        }
    }

    pub fn stereo(self) -> BondStereo {
        match self {
            BondPrefix::Up => BondStereo::Up,
            BondPrefix::Down => BondStereo::Down,
            _ => BondStereo::None,
        }
    }
}

/// A classified symbol. Everything after classification switches on this
/// enum rather than on symbol text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Atom { prefix: BondPrefix, atom: Atom },
    /// Opens a branch; `depth` is 1, 2 or 3.
    Branch { prefix: BondPrefix, depth: u8 },
    /// Closes a ring; `depth` is 1, 2 or 3.
    Ring { prefix: BondPrefix, depth: u8 },
    Epsilon,
    Unknown,
}

/// Classify one bracketed symbol, brackets included.
///
/// Text that matches no grammar shape becomes [`Symbol::Unknown`], which
/// [`decode_fragment`](super::decode_fragment) rejects before the walk
/// starts. Shapes that match but carry bad payloads fail here.
pub fn classify(text: &str) -> Result<Symbol, DecodeError> {
    let Some(interior) = text.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return Ok(Symbol::Unknown);
    };

    if text == EPSILON {
        return Ok(Symbol::Epsilon);
    }

    let (prefix, rest) = match interior.chars().next().and_then(BondPrefix::from_char) {
        Some(prefix) => (prefix, &interior[1..]),
        None => (BondPrefix::None, interior),
    };

    if let Some(tag) = rest.strip_prefix("Branch") {
        let depth = parse_depth(tag).ok_or_else(|| DecodeError::InvalidBranchType {
            symbol: text.to_string(),
        })?;
        return Ok(Symbol::Branch { prefix, depth });
    }

    if let Some(tag) = rest.strip_prefix("Ring") {
        let depth = parse_depth(tag).ok_or_else(|| DecodeError::InvalidRingType {
            symbol: text.to_string(),
        })?;
        return Ok(Symbol::Ring { prefix, depth });
    }

    match parse_atom(rest) {
        AtomShape::Parsed {
            element,
            is_aromatic,
            isotope,
            chirality,
            hcount,
            charge,
        } => {
            let atom = Atom::new(element, is_aromatic, isotope, chirality, hcount, charge)
                .ok_or_else(|| DecodeError::NegativeBondingCapacity {
                    symbol: text.to_string(),
                })?;
            Ok(Symbol::Atom { prefix, atom })
        }
        AtomShape::UnknownElement => Err(DecodeError::InvalidSymbol {
            symbol: text.to_string(),
        }),
        AtomShape::NoMatch => Ok(Symbol::Unknown),
    }
}

fn parse_depth(tag: &str) -> Option<u8> {
    match tag {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

enum AtomShape {
    Parsed {
        element: Element,
        is_aromatic: bool,
        isotope: Option<u16>,
        chirality: Chirality,
        hcount: u8,
        charge: i8,
    },
    /// An upper-case letter sits where the element goes but names nothing.
    UnknownElement,
    NoMatch,
}

fn parse_atom(body: &str) -> AtomShape {
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;

    let Some(isotope) = parse_isotope(&chars, &mut i) else {
        return AtomShape::NoMatch;
    };

    let (element, is_aromatic) = match parse_element(&chars, &mut i) {
        Some(found) => found,
        None if chars.get(i).is_some_and(|c| c.is_ascii_uppercase()) => {
            return AtomShape::UnknownElement;
        }
        None => return AtomShape::NoMatch,
    };

    let chirality = parse_chirality(&chars, &mut i);

    let Some(hcount) = parse_hcount(&chars, &mut i) else {
        return AtomShape::NoMatch;
    };

    let Some(charge) = parse_charge(&chars, &mut i) else {
        return AtomShape::NoMatch;
    };

    if i != chars.len() {
        return AtomShape::NoMatch;
    }

    AtomShape::Parsed {
        element,
        is_aromatic,
        isotope,
        chirality,
        hcount,
        charge,
    }
}

/// `None` on overflow; `Some(None)` when no digits are present.
fn parse_isotope(chars: &[char], i: &mut usize) -> Option<Option<u16>> {
    let mut val: Option<u16> = None;
    while *i < chars.len() && chars[*i].is_ascii_digit() {
        let digit = chars[*i] as u16 - b'0' as u16;
        val = Some(val.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
        *i += 1;
    }
    Some(val)
}

fn parse_element(chars: &[char], i: &mut usize) -> Option<(Element, bool)> {
    if *i >= chars.len() {
        return None;
    }

    // Aromatic two-letter forms first so `se` is not read as `s` + `e`.
    for len in [2, 1] {
        if *i + len <= chars.len() {
            let slice: String = chars[*i..*i + len].iter().collect();
            if let Some(e) = Element::from_aromatic_symbol(&slice) {
                *i += len;
                return Some((e, true));
            }
        }
    }

    // Try two-char uppercase element first, then one-char
    if *i + 1 < chars.len() && chars[*i].is_ascii_uppercase() && chars[*i + 1].is_ascii_lowercase()
    {
        let sym: String = chars[*i..=*i + 1].iter().collect();
        if let Some(e) = Element::from_symbol(&sym) {
            *i += 2;
            return Some((e, false));
        }
    }

    if chars[*i].is_ascii_uppercase() {
        let sym: String = chars[*i..=*i].iter().collect();
        if let Some(e) = Element::from_symbol(&sym) {
            *i += 1;
            return Some((e, false));
        }
    }

    None
}

fn parse_chirality(chars: &[char], i: &mut usize) -> Chirality {
    if *i < chars.len() && chars[*i] == '@' {
        *i += 1;
        if *i < chars.len() && chars[*i] == '@' {
            *i += 1;
            Chirality::Cw
        } else {
            Chirality::Ccw
        }
    } else {
        Chirality::None
    }
}

/// `None` on overflow.
fn parse_hcount(chars: &[char], i: &mut usize) -> Option<u8> {
    if *i >= chars.len() || chars[*i] != 'H' {
        return Some(0);
    }
    *i += 1;
    if *i >= chars.len() || !chars[*i].is_ascii_digit() {
        return Some(1);
    }
    let mut count: u8 = 0;
    while *i < chars.len() && chars[*i].is_ascii_digit() {
        count = count
            .checked_mul(10)?
            .checked_add(chars[*i] as u8 - b'0')?;
        *i += 1;
    }
    Some(count)
}

/// `None` on overflow.
fn parse_charge(chars: &[char], i: &mut usize) -> Option<i8> {
    let sign: i8 = match chars.get(*i) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Some(0),
    };
    let sign_char = chars[*i];
    *i += 1;

    if *i < chars.len() && chars[*i] == sign_char {
        let mut count: i8 = 1;
        while *i < chars.len() && chars[*i] == sign_char {
            count = count.checked_add(1)?;
            *i += 1;
        }
        Some(sign * count)
    } else if *i < chars.len() && chars[*i].is_ascii_digit() {
        let mut val: i8 = 0;
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            val = val
                .checked_mul(10)?
                .checked_add(chars[*i] as i8 - b'0' as i8)?;
            *i += 1;
        }
        Some(sign * val)
    } else {
        Some(sign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(text: &str) -> (BondPrefix, Atom) {
        match classify(text).unwrap() {
            Symbol::Atom { prefix, atom } => (prefix, atom),
            other => panic!("expected atom for {text}, got {other:?}"),
        }
    }

    #[test]
    fn plain_carbon() {
        let (prefix, a) = atom("[C]");
        assert_eq!(prefix, BondPrefix::None);
        assert_eq!(a.element, Element::C);
        assert_eq!(a.bonding_capacity, 4);
        assert!(a.is_bare());
    }

    #[test]
    fn double_bond_prefix() {
        let (prefix, a) = atom("[=O]");
        assert_eq!(prefix, BondPrefix::Double);
        assert_eq!(prefix.order(), 2);
        assert_eq!(a.element, Element::O);
    }

    #[test]
    fn stereo_prefixes() {
        assert_eq!(atom("[/C]").0, BondPrefix::Up);
        assert_eq!(atom("[\\C]").0, BondPrefix::Down);
        assert_eq!(BondPrefix::Up.stereo(), BondStereo::Up);
        assert_eq!(atom("[#N]").0.order(), 3);
    }

    #[test]
    fn two_letter_elements() {
        assert_eq!(atom("[Cl]").1.element, Element::Cl);
        assert_eq!(atom("[Br]").1.element, Element::Br);
        assert_eq!(atom("[Fe]").1.element, Element::Fe);
    }

    #[test]
    fn full_bracket_atom() {
        let (_, a) = atom("[13C@@H2+]");
        assert_eq!(a.isotope, Some(13));
        assert_eq!(a.element, Element::C);
        assert_eq!(a.hydrogen_count, 2);
        assert_eq!(a.formal_charge, 1);
        // C+ carries 5, minus two hydrogens
        assert_eq!(a.bonding_capacity, 3);
        assert!(!a.is_bare());
    }

    #[test]
    fn chirality_then_hydrogen() {
        let (_, a) = atom("[C@@H1]");
        assert_eq!(a.chirality, Chirality::Cw);
        assert_eq!(a.hydrogen_count, 1);
        assert_eq!(a.bonding_capacity, 3);
        assert_eq!(atom("[C@H1]").1.chirality, Chirality::Ccw);
    }

    #[test]
    fn charge_forms() {
        assert_eq!(atom("[O-1]").1.formal_charge, -1);
        assert_eq!(atom("[O-]").1.formal_charge, -1);
        assert_eq!(atom("[Fe++]").1.formal_charge, 2);
        assert_eq!(atom("[Fe+3]").1.formal_charge, 3);
        assert_eq!(atom("[O-1]").1.bonding_capacity, 1);
        assert_eq!(atom("[N+1]").1.bonding_capacity, 4);
    }

    #[test]
    fn aromatic_atoms() {
        let (_, c) = atom("[c]");
        assert!(c.is_aromatic);
        assert_eq!(c.element, Element::C);
        let (_, se) = atom("[se]");
        assert!(se.is_aromatic);
        assert_eq!(se.element, Element::Se);
    }

    #[test]
    fn branch_symbols() {
        assert_eq!(
            classify("[Branch1]").unwrap(),
            Symbol::Branch { prefix: BondPrefix::None, depth: 1 }
        );
        assert_eq!(
            classify("[=Branch2]").unwrap(),
            Symbol::Branch { prefix: BondPrefix::Double, depth: 2 }
        );
        assert_eq!(
            classify("[#Branch3]").unwrap(),
            Symbol::Branch { prefix: BondPrefix::Triple, depth: 3 }
        );
    }

    #[test]
    fn ring_symbols() {
        assert_eq!(
            classify("[Ring1]").unwrap(),
            Symbol::Ring { prefix: BondPrefix::None, depth: 1 }
        );
        assert_eq!(
            classify("[/Ring2]").unwrap(),
            Symbol::Ring { prefix: BondPrefix::Up, depth: 2 }
        );
    }

    #[test]
    fn bad_depth_tags() {
        assert!(matches!(
            classify("[Branch4]"),
            Err(DecodeError::InvalidBranchType { .. })
        ));
        assert!(matches!(
            classify("[Branch]"),
            Err(DecodeError::InvalidBranchType { .. })
        ));
        assert!(matches!(
            classify("[=Ring0]"),
            Err(DecodeError::InvalidRingType { .. })
        ));
    }

    #[test]
    fn epsilon() {
        assert_eq!(classify("[epsilon]").unwrap(), Symbol::Epsilon);
    }

    #[test]
    fn unknown_element_is_invalid() {
        assert_eq!(
            classify("[Zz]"),
            Err(DecodeError::InvalidSymbol {
                symbol: "[Zz]".to_string()
            })
        );
    }

    #[test]
    fn shapeless_text_is_unknown() {
        assert_eq!(classify("[foo]").unwrap(), Symbol::Unknown);
        assert_eq!(classify("[123]").unwrap(), Symbol::Unknown);
        assert_eq!(classify("[C@x]").unwrap(), Symbol::Unknown);
        assert_eq!(classify("[]").unwrap(), Symbol::Unknown);
    }

    #[test]
    fn impossible_hydrogen_count() {
        assert_eq!(
            classify("[OH3]"),
            Err(DecodeError::NegativeBondingCapacity {
                symbol: "[OH3]".to_string()
            })
        );
        assert!(classify("[OH2]").is_ok());
    }
}
