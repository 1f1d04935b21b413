use log::trace;
use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::selfies::derive::RingRecord;

/// Turn recorded ring requests into bonds.
///
/// Each record bonds its source to the atom `distance` places earlier
/// (clamped to atom 0). A request is dropped when the pair is already bonded,
/// when it would bond an atom to itself, or when either end has no free
/// valence left. Otherwise the order is clamped to the free valence of both
/// ends, so no atom is ever pushed past its capacity.
pub fn resolve_rings(mol: &mut Mol, rings: &[RingRecord]) {
    for ring in rings {
        let source = ring.source;
        let target = NodeIndex::new(source.index().saturating_sub(ring.distance));

        if target == source || mol.bond_between(source, target).is_some() {
            trace!(
                "ring {} -> {} dropped: already bonded",
                source.index(),
                target.index()
            );
            continue;
        }

        // triple is the highest order a bond can carry
        let order = ring
            .order
            .min(3)
            .min(mol.free_valence(source))
            .min(mol.free_valence(target));
        if order == 0 {
            trace!(
                "ring {} -> {} dropped: no free valence",
                source.index(),
                target.index()
            );
            continue;
        }

        mol.connect(source, target, order, ring.stereo, true);
    }
}
