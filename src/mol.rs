use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, BondStereo};

/// Molecular graph built by one decode call.
///
/// Atoms live in a flat arena and are addressed by the `NodeIndex` handed
/// out at insertion. Every undirected bond is stored as two directed edges
/// with identical payloads, so lookups work from either endpoint. Alongside
/// the arena the graph keeps per-atom neighbor lists in insertion order
/// (which fixes the order atoms are written in) and a running bond-order sum
/// per atom, kept in half-bond units so that aromatic bonds stay exact.
pub struct Mol {
    graph: DiGraph<Atom, Bond>,
    adjacency: Vec<Vec<NodeIndex>>,
    usage: Vec<u16>,
    roots: Vec<NodeIndex>,
}

impl Mol {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            adjacency: Vec::new(),
            usage: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn graph(&self) -> &DiGraph<Atom, Bond> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub(crate) fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        let idx = self.graph.add_node(atom);
        self.adjacency.push(Vec::new());
        self.usage.push(0);
        idx
    }

    /// Mark an atom as the start of a new connected fragment.
    pub fn add_root(&mut self, idx: NodeIndex) {
        self.roots.push(idx);
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Insert the bond `a`–`b` as two mirrored directed records and charge
    /// its order to both endpoints. Returns the `a → b` edge.
    ///
    /// Callers are responsible for clamping the order to the free valence of
    /// both atoms first.
    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        debug_assert_ne!(a, b, "self-bond on atom {}", a.index());
        debug_assert!(self.bond_between(a, b).is_none(), "duplicate bond");

        let forward = self.graph.add_edge(a, b, bond);
        self.graph.add_edge(b, a, bond);
        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);

        let units = bond.order.half_units();
        self.usage[a.index()] += units;
        self.usage[b.index()] += units;
        forward
    }

    /// Bond `a` and `b` with `count` whole bond orders. A single bond between
    /// two aromatic atoms becomes aromatic when both have room for the extra
    /// half order. Returns `None` if `count` is not 1, 2 or 3.
    pub(crate) fn connect(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        count: u8,
        stereo: BondStereo,
        is_ring: bool,
    ) -> Option<EdgeIndex> {
        let mut order = BondOrder::from_count(count)?;
        if order == BondOrder::Single
            && self.atom(a).is_aromatic
            && self.atom(b).is_aromatic
            && self.has_room(a, BondOrder::Aromatic.half_units())
            && self.has_room(b, BondOrder::Aromatic.half_units())
        {
            order = BondOrder::Aromatic;
        }
        Some(self.add_bond(
            a,
            b,
            Bond {
                order,
                stereo,
                is_ring,
            },
        ))
    }

    /// The directed record `a → b`, if the atoms are bonded.
    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Change the order of the bond `a`–`b` on both records and adjust both
    /// usage counters. Returns `false` if there is no such bond.
    pub fn set_bond_order(&mut self, a: NodeIndex, b: NodeIndex, order: BondOrder) -> bool {
        let (Some(forward), Some(backward)) = (self.graph.find_edge(a, b), self.graph.find_edge(b, a))
        else {
            return false;
        };
        let old = self.graph[forward].order;
        self.graph[forward].order = order;
        self.graph[backward].order = order;

        for atom in [a, b] {
            let slot = &mut self.usage[atom.index()];
            *slot = *slot - old.half_units() + order.half_units();
        }
        true
    }

    /// Neighbors of `idx` in the order their bonds were inserted.
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.adjacency[idx.index()]
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Each undirected bond once, as `(lower index, higher index, bond)`.
    pub fn bonds(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Bond)> + '_ {
        self.graph
            .edge_references()
            .filter(|e| e.source().index() < e.target().index())
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected bonds.
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count() / 2
    }

    /// Total bond order currently charged to `idx`.
    pub fn bond_order_sum(&self, idx: NodeIndex) -> f32 {
        f32::from(self.usage[idx.index()]) / 2.0
    }

    pub(crate) fn usage_half_units(&self, idx: NodeIndex) -> u16 {
        self.usage[idx.index()]
    }

    /// Whole bond orders still available on `idx`.
    pub fn free_valence(&self, idx: NodeIndex) -> u8 {
        let capacity = u16::from(self.atom(idx).bonding_capacity) * 2;
        let free = capacity.saturating_sub(self.usage[idx.index()]) / 2;
        free as u8
    }

    /// Whether `idx` can take `half_units` more bond order without exceeding
    /// its capacity.
    pub fn has_room(&self, idx: NodeIndex, half_units: u16) -> bool {
        let capacity = u16::from(self.atom(idx).bonding_capacity) * 2;
        self.usage[idx.index()] + half_units <= capacity
    }
}

impl Clone for Mol {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            adjacency: self.adjacency.clone(),
            usage: self.usage.clone(),
            roots: self.roots.clone(),
        }
    }
}

impl Default for Mol {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("roots", &self.roots)
            .finish()
    }
}
