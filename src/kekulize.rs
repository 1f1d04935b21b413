//! Kekulization assigns alternating single and double bonds to aromatic
//! systems.
//!
//! The matching is greedy: atoms are visited in index order and each
//! unmatched aromatic atom takes the first unmatched aromatic neighbor (in
//! bond insertion order) it shares a 1.5 bond with. That is not a maximum
//! matching; an odd-membered aromatic ring, or an unlucky visiting order in
//! a fused system, leaves some atoms without a double bond. Those bonds are
//! written as single bonds rather than rejected.

use log::trace;
use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::mol::Mol;

/// Replace every aromatic bond in `mol` with a single or double bond and
/// clear every aromatic flag. Returns the number of bonds promoted to
/// double.
///
/// A bond is only promoted when both ends still fit their bonding capacity
/// with it as a double bond and their other aromatic bonds as single, so no
/// atom ends up over capacity.
pub fn kekulize(mol: &mut Mol) -> usize {
    let n = mol.atom_count();
    let mut matched = vec![false; n];
    let mut promoted = 0;

    for i in 0..n {
        let node = NodeIndex::new(i);
        if matched[i] || !mol.atom(node).is_aromatic {
            continue;
        }

        let partner = mol.neighbors(node).iter().copied().find(|&nb| {
            !matched[nb.index()]
                && mol.atom(nb).is_aromatic
                && is_aromatic_bond(mol, node, nb)
                && fits_as_double(mol, node)
                && fits_as_double(mol, nb)
        });

        if let Some(nb) = partner {
            mol.set_bond_order(node, nb, BondOrder::Double);
            matched[i] = true;
            matched[nb.index()] = true;
            promoted += 1;
        }
    }

    let leftover: Vec<(NodeIndex, NodeIndex)> = mol
        .bonds()
        .filter(|(_, _, bond)| bond.order == BondOrder::Aromatic)
        .map(|(a, b, _)| (a, b))
        .collect();
    for &(a, b) in &leftover {
        mol.set_bond_order(a, b, BondOrder::Single);
    }

    for i in 0..n {
        mol.atom_mut(NodeIndex::new(i)).is_aromatic = false;
    }

    trace!(
        "kekulized: {promoted} double, {} single",
        leftover.len()
    );
    promoted
}

fn is_aromatic_bond(mol: &Mol, a: NodeIndex, b: NodeIndex) -> bool {
    mol.bond_between(a, b)
        .is_some_and(|e| mol.bond(e).order == BondOrder::Aromatic)
}

// Usage of `idx` once one of its aromatic bonds is double and the rest are
// single, against its capacity.
fn fits_as_double(mol: &Mol, idx: NodeIndex) -> bool {
    let aromatic = mol
        .neighbors(idx)
        .iter()
        .filter(|&&nb| is_aromatic_bond(mol, idx, nb))
        .count() as u16;
    let single = BondOrder::Single.half_units();
    let projected = mol.usage_half_units(idx) - aromatic * (BondOrder::Aromatic.half_units() - single)
        + (BondOrder::Double.half_units() - single);
    projected <= u16::from(mol.atom(idx).bonding_capacity) * 2
}
