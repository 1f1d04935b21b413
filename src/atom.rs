use crate::element::Element;

/// Chirality marker carried through from the input symbol.
///
/// The decoder does not interpret these; they are written back out exactly
/// as they were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// `@`
    Ccw,
    /// `@@`
    Cw,
}

impl Chirality {
    pub fn as_str(self) -> &'static str {
        match self {
            Chirality::None => "",
            Chirality::Ccw => "@",
            Chirality::Cw => "@@",
        }
    }
}

/// A decoded atom.
///
/// `bonding_capacity` is derived once from element, charge and explicit
/// hydrogens by [`Atom::new`] and never changes afterwards.
///
/// # Examples
///
/// ```
/// use selfcrab::{Atom, Element};
///
/// let oxygen = Atom::new(Element::O, false, None, Default::default(), 1, 0).unwrap();
/// assert_eq!(oxygen.bonding_capacity, 1);
/// assert!(!oxygen.is_bare());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    /// Set for lower-case input symbols. Cleared by kekulization.
    pub is_aromatic: bool,
    /// Mass number, `None` for natural abundance.
    pub isotope: Option<u16>,
    pub chirality: Chirality,
    /// Explicit attached hydrogens from an `H` count in the symbol.
    pub hydrogen_count: u8,
    pub formal_charge: i8,
    /// Maximum total bond order this atom may carry in the graph.
    pub bonding_capacity: u8,
}

impl Atom {
    /// Build an atom, returning `None` when the explicit hydrogens exceed
    /// what the element can carry at this charge.
    pub fn new(
        element: Element,
        is_aromatic: bool,
        isotope: Option<u16>,
        chirality: Chirality,
        hydrogen_count: u8,
        formal_charge: i8,
    ) -> Option<Atom> {
        let bonding_capacity = element
            .max_bonds(formal_charge)
            .checked_sub(hydrogen_count)?;
        Some(Atom {
            element,
            is_aromatic,
            isotope,
            chirality,
            hydrogen_count,
            formal_charge,
            bonding_capacity,
        })
    }

    /// A plain organic-subset atom with default capacity.
    pub fn organic(element: Element) -> Atom {
        Atom {
            element,
            is_aromatic: false,
            isotope: None,
            chirality: Chirality::None,
            hydrogen_count: 0,
            formal_charge: 0,
            bonding_capacity: element.max_bonds(0),
        }
    }

    /// True when the atom can be written without brackets: an organic-subset
    /// element with no isotope, chirality, explicit hydrogens or charge.
    pub fn is_bare(&self) -> bool {
        self.element.is_organic_subset()
            && self.isotope.is_none()
            && self.chirality == Chirality::None
            && self.hydrogen_count == 0
            && self.formal_charge == 0
            && (!self.is_aromatic || self.element.is_bare_aromatic())
    }
}
