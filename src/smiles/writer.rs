use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;

/// Write `mol` as SMILES.
///
/// Each recorded root starts a fragment, followed by any atom the roots did
/// not reach, in index order. Fragments are joined with `.`. Neighbors are
/// visited in bond insertion order, so the output follows the order atoms
/// were derived in.
pub fn to_smiles(mol: &Mol) -> String {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut parts = Vec::new();

    let starts = mol
        .roots()
        .iter()
        .copied()
        .chain((0..n).map(NodeIndex::new));
    for start in starts {
        if visited[start.index()] {
            continue;
        }
        let tree = SpanningTree::build(mol, start, &mut visited);
        parts.push(write_fragment(mol, start, &tree));
    }
    parts.join(".")
}

/// DFS tree of one fragment plus the back edges that become ring closures.
/// A closure opens at the atom written first and closes at the other one.
struct SpanningTree {
    children: HashMap<NodeIndex, Vec<NodeIndex>>,
    ring_opens: HashMap<NodeIndex, Vec<NodeIndex>>,
    ring_closes: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl SpanningTree {
    fn build(mol: &Mol, start: NodeIndex, visited: &mut [bool]) -> Self {
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut children: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut ring_opens: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut ring_closes: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut closed: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();

        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        visited[start.index()] = true;

        loop {
            let Some(&mut (node, ref mut ni)) = stack.last_mut() else {
                break;
            };
            let neighbors = mol.neighbors(node);
            if *ni >= neighbors.len() {
                stack.pop();
                continue;
            }
            let neighbor = neighbors[*ni];
            *ni += 1;

            if !visited[neighbor.index()] {
                visited[neighbor.index()] = true;
                parent.insert(neighbor, node);
                children.entry(node).or_default().push(neighbor);
                stack.push((neighbor, 0));
            } else if parent.get(&node) != Some(&neighbor)
                && closed.insert(ordered_pair(node, neighbor))
            {
                // `neighbor` is an ancestor still on the stack
                ring_opens.entry(neighbor).or_default().push(node);
                ring_closes.entry(node).or_default().push(neighbor);
            }
        }

        SpanningTree {
            children,
            ring_opens,
            ring_closes,
        }
    }

    fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ring_opens(&self, node: NodeIndex) -> &[NodeIndex] {
        self.ring_opens.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ring_closes(&self, node: NodeIndex) -> &[NodeIndex] {
        self.ring_closes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn ordered_pair(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Ring-closure numbers in use. A new closure takes the lowest free number.
#[derive(Default)]
struct RingNumbers {
    in_use: Vec<bool>,
    open: HashMap<(NodeIndex, NodeIndex), usize>,
}

impl RingNumbers {
    fn open(&mut self, a: NodeIndex, b: NodeIndex) -> usize {
        let slot = match self.in_use.iter().position(|used| !used) {
            Some(slot) => slot,
            None => {
                self.in_use.push(false);
                self.in_use.len() - 1
            }
        };
        self.in_use[slot] = true;
        self.open.insert(ordered_pair(a, b), slot);
        slot + 1
    }

    fn close(&mut self, a: NodeIndex, b: NodeIndex) -> Option<usize> {
        let slot = self.open.remove(&ordered_pair(a, b))?;
        self.in_use[slot] = false;
        Some(slot + 1)
    }
}

enum Frame {
    Atom {
        node: NodeIndex,
        parent: Option<NodeIndex>,
        branch: bool,
    },
    CloseBranch,
}

fn write_fragment(mol: &Mol, start: NodeIndex, tree: &SpanningTree) -> String {
    let mut out = String::new();
    let mut rings = RingNumbers::default();
    let mut stack = vec![Frame::Atom {
        node: start,
        parent: None,
        branch: false,
    }];

    while let Some(frame) = stack.pop() {
        let (node, parent, branch) = match frame {
            Frame::CloseBranch => {
                out.push(')');
                continue;
            }
            Frame::Atom {
                node,
                parent,
                branch,
            } => (node, parent, branch),
        };

        if branch {
            out.push('(');
        }
        if let Some(parent) = parent {
            write_bond(mol, parent, node, &mut out);
        }
        write_atom(mol.atom(node), &mut out);

        for &other in tree.ring_opens(node) {
            let id = rings.open(node, other);
            write_ring_digit(id, &mut out);
        }
        for &other in tree.ring_closes(node) {
            if let Some(id) = rings.close(node, other) {
                write_bond(mol, node, other, &mut out);
                write_ring_digit(id, &mut out);
            }
        }

        let kids = tree.children(node);
        if let Some((&last, rest)) = kids.split_last() {
            stack.push(Frame::Atom {
                node: last,
                parent: Some(node),
                branch: false,
            });
            for &child in rest.iter().rev() {
                stack.push(Frame::CloseBranch);
                stack.push(Frame::Atom {
                    node: child,
                    parent: Some(node),
                    branch: true,
                });
            }
        }
    }
    out
}

fn write_bond(mol: &Mol, from: NodeIndex, to: NodeIndex, out: &mut String) {
    let Some(edge) = mol.bond_between(from, to) else {
        return;
    };
    let both_aromatic = mol.atom(from).is_aromatic && mol.atom(to).is_aromatic;
    if let Some(c) = bond_symbol(mol.bond(edge), both_aromatic) {
        out.push(c);
    }
}

fn bond_symbol(bond: &Bond, both_aromatic: bool) -> Option<char> {
    match bond.order {
        BondOrder::Single => match bond.stereo.as_char() {
            Some(c) => Some(c),
            None if both_aromatic => Some('-'),
            None => None,
        },
        BondOrder::Aromatic if both_aromatic => None,
        BondOrder::Aromatic => Some(':'),
        BondOrder::Double => Some('='),
        BondOrder::Triple => Some('#'),
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else {
        out.push('%');
        out.push_str(&id.to_string());
    }
}

fn write_atom(atom: &Atom, out: &mut String) {
    if atom.is_bare() {
        write_symbol(atom, out);
    } else {
        write_bracket_atom(atom, out);
    }
}

fn write_symbol(atom: &Atom, out: &mut String) {
    let symbol = atom.element.symbol();
    if atom.is_aromatic {
        out.extend(symbol.chars().map(|c| c.to_ascii_lowercase()));
    } else {
        out.push_str(symbol);
    }
}

fn write_bracket_atom(atom: &Atom, out: &mut String) {
    out.push('[');

    if let Some(isotope) = atom.isotope {
        out.push_str(&isotope.to_string());
    }

    write_symbol(atom, out);

    if atom.chirality != Chirality::None {
        out.push_str(atom.chirality.as_str());
    }

    if atom.hydrogen_count > 0 {
        out.push('H');
        if atom.hydrogen_count > 1 {
            out.push_str(&atom.hydrogen_count.to_string());
        }
    }

    if atom.formal_charge > 0 {
        out.push('+');
        if atom.formal_charge > 1 {
            out.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        out.push('-');
        if atom.formal_charge < -1 {
            out.push_str(&atom.formal_charge.unsigned_abs().to_string());
        }
    }

    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondStereo;
    use crate::element::Element;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn build(elements: &[Element], bonds: &[(usize, usize, u8)]) -> Mol {
        let mut mol = Mol::new();
        for &e in elements {
            mol.add_atom(Atom::organic(e));
        }
        if !elements.is_empty() {
            mol.add_root(n(0));
        }
        for &(a, b, order) in bonds {
            mol.connect(n(a), n(b), order, BondStereo::None, false);
        }
        mol
    }

    fn bracket(
        element: Element,
        isotope: Option<u16>,
        chirality: Chirality,
        hydrogens: u8,
        charge: i8,
    ) -> String {
        let atom = Atom::new(element, false, isotope, chirality, hydrogens, charge).unwrap();
        let mut out = String::new();
        write_atom(&atom, &mut out);
        out
    }

    #[test]
    fn empty_mol() {
        assert_eq!(to_smiles(&Mol::new()), "");
    }

    #[test]
    fn chain() {
        let mol = build(&[Element::C; 4], &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        assert_eq!(to_smiles(&mol), "CCCC");
    }

    #[test]
    fn bond_orders() {
        let mol = build(
            &[Element::C, Element::C, Element::N],
            &[(0, 1, 2), (1, 2, 1)],
        );
        assert_eq!(to_smiles(&mol), "C=CN");
        let mol = build(&[Element::C, Element::N], &[(0, 1, 3)]);
        assert_eq!(to_smiles(&mol), "C#N");
    }

    #[test]
    fn branches_parenthesize_all_but_last() {
        // C(O)(N)F written from atom 0
        let mol = build(
            &[Element::C, Element::O, Element::N, Element::F],
            &[(0, 1, 1), (0, 2, 1), (0, 3, 1)],
        );
        assert_eq!(to_smiles(&mol), "C(O)(N)F");
    }

    #[test]
    fn nested_branch() {
        let mol = build(
            &[Element::C, Element::C, Element::O, Element::C],
            &[(0, 1, 1), (1, 2, 2), (1, 3, 1)],
        );
        assert_eq!(to_smiles(&mol), "CC(=O)C");
    }

    #[test]
    fn ring_closure_on_closing_side() {
        let mut mol = build(&[Element::C; 6], &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 5, 1)]);
        mol.connect(n(5), n(0), 2, BondStereo::None, true);
        assert_eq!(to_smiles(&mol), "C1CCCCC=1");
    }

    #[test]
    fn ring_numbers_are_reused() {
        // two separate three-membered rings joined by a bond
        let mut mol = build(
            &[Element::C; 6],
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 5, 1)],
        );
        mol.connect(n(2), n(0), 1, BondStereo::None, true);
        mol.connect(n(5), n(3), 1, BondStereo::None, true);
        assert_eq!(to_smiles(&mol), "C1CC1C1CC1");
    }

    #[test]
    fn nested_rings_take_lowest_free_number() {
        let mut mol = build(&[Element::C; 4], &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        mol.connect(n(3), n(0), 1, BondStereo::None, true);
        mol.connect(n(3), n(1), 1, BondStereo::None, true);
        assert_eq!(to_smiles(&mol), "C1C2CC12");
    }

    #[test]
    fn two_digit_ring_numbers() {
        let mut out = String::new();
        write_ring_digit(7, &mut out);
        write_ring_digit(12, &mut out);
        assert_eq!(out, "7%12");

        let mut rings = RingNumbers::default();
        for i in 0..11 {
            rings.open(n(i), n(100 + i));
        }
        assert_eq!(rings.open(n(50), n(51)), 12);
        assert_eq!(rings.close(n(103), n(3)), Some(4));
        assert_eq!(rings.open(n(60), n(61)), 4);
        assert_eq!(rings.close(n(1), n(2)), None);
    }

    #[test]
    fn disconnected_atoms_joined_with_dot() {
        let mut mol = build(&[Element::C, Element::O], &[]);
        mol.add_atom(Atom::organic(Element::N));
        assert_eq!(to_smiles(&mol), "C.O.N");
    }

    #[test]
    fn roots_come_first() {
        let mut mol = Mol::new();
        let a = mol.add_atom(Atom::organic(Element::O));
        let b = mol.add_atom(Atom::organic(Element::C));
        mol.add_root(b);
        mol.add_root(a);
        assert_eq!(to_smiles(&mol), "C.O");
    }

    #[test]
    fn aromatic_atoms_and_bonds() {
        let mut mol = Mol::new();
        let atoms: Vec<NodeIndex> = (0..6)
            .map(|_| {
                mol.add_atom(Atom::new(Element::C, true, None, Chirality::None, 0, 0).unwrap())
            })
            .collect();
        mol.add_root(atoms[0]);
        for w in atoms.windows(2) {
            mol.connect(w[0], w[1], 1, BondStereo::None, false);
        }
        mol.connect(atoms[5], atoms[0], 1, BondStereo::None, true);
        assert_eq!(to_smiles(&mol), "c1ccccc1");
    }

    #[test]
    fn single_bond_between_aromatic_atoms_is_explicit() {
        let bond = Bond::default();
        assert_eq!(bond_symbol(&bond, true), Some('-'));
        assert_eq!(bond_symbol(&bond, false), None);
        let aromatic = Bond {
            order: BondOrder::Aromatic,
            ..Bond::default()
        };
        assert_eq!(bond_symbol(&aromatic, true), None);
        assert_eq!(bond_symbol(&aromatic, false), Some(':'));
    }

    #[test]
    fn stereo_marks_single_bonds() {
        let mut mol = build(&[Element::F, Element::C], &[]);
        mol.connect(n(0), n(1), 1, BondStereo::Up, false);
        assert_eq!(to_smiles(&mol), "F/C");
        let mut mol = build(&[Element::F, Element::C], &[]);
        mol.connect(n(0), n(1), 1, BondStereo::Down, false);
        assert_eq!(to_smiles(&mol), "F\\C");
    }

    #[test]
    fn bracket_atoms() {
        assert_eq!(bracket(Element::C, Some(13), Chirality::Cw, 2, 1), "[13C@@H2+]");
        assert_eq!(bracket(Element::O, None, Chirality::None, 1, 0), "[OH]");
        assert_eq!(bracket(Element::N, None, Chirality::None, 0, 1), "[N+]");
        assert_eq!(bracket(Element::O, None, Chirality::None, 0, -1), "[O-]");
        assert_eq!(bracket(Element::S, None, Chirality::None, 0, -2), "[S-2]");
        assert_eq!(bracket(Element::Fe, None, Chirality::None, 0, 2), "[Fe+2]");
        assert_eq!(bracket(Element::C, None, Chirality::Ccw, 1, 0), "[C@H]");
        assert_eq!(bracket(Element::C, None, Chirality::None, 0, 0), "C");
    }

    #[test]
    fn aromatic_bracket_is_lowercase() {
        let atom = Atom::new(Element::N, true, None, Chirality::None, 1, 0).unwrap();
        let mut out = String::new();
        write_atom(&atom, &mut out);
        assert_eq!(out, "[nH]");
    }
}
