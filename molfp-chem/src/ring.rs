//! Ring perception: ring atoms, the smallest set of smallest rings, ring bonds.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Bonds lying on a cycle, i.e. every bond that is not a bridge.
///
/// Bridges are found with an iterative depth-first search tracking the
/// lowest discovery index reachable from each subtree.
pub fn cyclic_bond_flags(mol: &Molecule) -> Vec<bool> {
    const UNSEEN: usize = usize::MAX;
    let mut discovered = vec![UNSEEN; mol.atom_count()];
    let mut low = vec![0; mol.atom_count()];
    let mut cyclic = vec![true; mol.bond_count()];
    let mut clock = 0;

    for root in 0..mol.atom_count() {
        if discovered[root] != UNSEEN {
            continue;
        }
        discovered[root] = clock;
        low[root] = clock;
        clock += 1;
        // (atom, bond it was entered through, next adjacency slot)
        let mut stack = vec![(root, None, 0)];
        while let Some(frame) = stack.last_mut() {
            let (atom, entered_by) = (frame.0, frame.1);
            let step = mol.adjacency[atom].get(frame.2).copied();
            frame.2 += 1;
            match step {
                Some((_, bond)) if Some(bond) == entered_by => {}
                Some((nbr, bond)) if discovered[nbr] == UNSEEN => {
                    discovered[nbr] = clock;
                    low[nbr] = clock;
                    clock += 1;
                    stack.push((nbr, Some(bond), 0));
                }
                Some((nbr, _)) => low[atom] = low[atom].min(discovered[nbr]),
                None => {
                    stack.pop();
                    if let (Some(&(parent, _, _)), Some(bond)) = (stack.last(), entered_by) {
                        low[parent] = low[parent].min(low[atom]);
                        if low[atom] > discovered[parent] {
                            cyclic[bond] = false;
                        }
                    }
                }
            }
        }
    }
    cyclic
}

/// Atoms lying on a cycle: those touching at least one cyclic bond.
///
/// Atoms on a chain linking two rings are not ring atoms.
pub fn ring_atom_flags(mol: &Molecule) -> Vec<bool> {
    let mut in_ring = vec![false; mol.atom_count()];
    for (bond, cyclic) in mol.bonds.iter().zip(cyclic_bond_flags(mol)) {
        if cyclic {
            in_ring[bond.atom1] = true;
            in_ring[bond.atom2] = true;
        }
    }
    in_ring
}

/// Smallest set of smallest rings.
///
/// Each ring bond contributes the shortest cycle through it; distinct cycles
/// are kept smallest first, up to the cyclomatic number of the graph. Rings
/// are ordered cycles starting at their lowest atom index.
pub fn find_sssr(mol: &Molecule) -> Vec<Vec<usize>> {
    let cyclomatic = (mol.bond_count() + mol.fragment_count()).saturating_sub(mol.atom_count());
    if cyclomatic == 0 {
        return Vec::new();
    }

    let cyclic = cyclic_bond_flags(mol);
    let in_ring = ring_atom_flags(mol);
    let mut rings: Vec<Vec<usize>> = Vec::new();
    for (idx, bond) in mol.bonds.iter().enumerate() {
        if !cyclic[idx] {
            continue;
        }
        let Some(mut cycle) = shortest_detour(mol, bond.atom1, bond.atom2, idx, &in_ring) else {
            continue;
        };
        canonical_rotation(&mut cycle);
        if !rings.contains(&cycle) {
            rings.push(cycle);
        }
    }

    rings.sort_by_key(Vec::len);
    rings.truncate(cyclomatic);
    rings
}

/// Flag the bonds joining consecutive atoms of the given rings.
///
/// `rings` must be ordered cycles as returned by [`find_sssr`].
pub fn ring_bond_flags(mol: &Molecule, rings: &[Vec<usize>]) -> Vec<bool> {
    let mut flags = vec![false; mol.bond_count()];
    for ring in rings {
        for (pos, &a) in ring.iter().enumerate() {
            let b = ring[(pos + 1) % ring.len()];
            if let Some(&(_, bond_idx)) = mol.adjacency[a].iter().find(|&&(n, _)| n == b) {
                flags[bond_idx] = true;
            }
        }
    }
    flags
}

/// Shortest path `from -> to` through ring atoms that does not use `skip_bond`.
fn shortest_detour(
    mol: &Molecule,
    from: usize,
    to: usize,
    skip_bond: usize,
    in_ring: &[bool],
) -> Option<Vec<usize>> {
    let mut prev: Vec<Option<usize>> = vec![None; mol.atom_count()];
    let mut seen = vec![false; mol.atom_count()];
    seen[from] = true;
    let mut queue = VecDeque::from([from]);

    while let Some(atom) = queue.pop_front() {
        if atom == to {
            let mut path = vec![to];
            let mut cur = to;
            while let Some(p) = prev[cur] {
                path.push(p);
                cur = p;
            }
            path.reverse();
            return Some(path);
        }
        for &(nbr, bond) in &mol.adjacency[atom] {
            if bond != skip_bond && in_ring[nbr] && !seen[nbr] {
                seen[nbr] = true;
                prev[nbr] = Some(atom);
                queue.push_back(nbr);
            }
        }
    }
    None
}

/// Rotate a cycle to start at its smallest atom and walk toward the smaller
/// of its two neighbours.
fn canonical_rotation(cycle: &mut [usize]) {
    if let Some(start) = (0..cycle.len()).min_by_key(|&i| cycle[i]) {
        cycle.rotate_left(start);
    }
    let n = cycle.len();
    if n > 2 && cycle[n - 1] < cycle[1] {
        cycle[1..].reverse();
    }
}
