//! Conversion between implicit hydrogen counts and explicit hydrogen atoms.
//!
//! Fingerprints are computed on the hydrogen-complete graph: every implicit
//! hydrogen becomes a graph node bonded to its parent by a single bond, so
//! C-H environments contribute their own identifiers and keys.

use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};

/// Return a copy of `mol` with every implicit hydrogen made explicit.
///
/// Heavy atoms keep their indices; new hydrogens are appended in parent order.
/// Implicit counts drop to zero, so applying this twice is a no-op.
pub fn add_explicit_hydrogens(mol: &Molecule) -> Molecule {
    let added: usize = mol.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
    if added == 0 {
        return mol.clone();
    }

    let mut atoms: Vec<MolAtom> = Vec::with_capacity(mol.atom_count() + added);
    let mut bonds: Vec<Bond> = Vec::with_capacity(mol.bond_count() + added);
    atoms.extend(mol.atoms.iter().cloned());
    bonds.extend(mol.bonds.iter().cloned());

    for (parent, atom) in mol.atoms.iter().enumerate() {
        for _ in 0..atom.implicit_hydrogens {
            let h_idx = atoms.len();
            atoms.push(MolAtom::hydrogen());
            bonds.push(Bond::new(parent, h_idx, BondOrder::Single));
        }
        atoms[parent].implicit_hydrogens = 0;
    }

    Molecule::new(mol.name.clone(), atoms, bonds)
}

/// Fold plain explicit hydrogens back into their parent's implicit count.
///
/// Charged, isotopic, unbonded or multiply-bonded hydrogens (e.g. `[H][H]`,
/// bridging hydrides) are kept as graph nodes.
pub fn remove_explicit_hydrogens(mol: &Molecule) -> Molecule {
    let removable: Vec<bool> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            atom.is_plain_hydrogen()
                && mol.degree(i) == 1
                && !mol.atoms[mol.adjacency[i][0].0].is_plain_hydrogen()
        })
        .collect();
    if !removable.iter().any(|&r| r) {
        return mol.clone();
    }

    let mut index_map = vec![usize::MAX; mol.atom_count()];
    let mut atoms = Vec::with_capacity(mol.atom_count());
    for (old_idx, atom) in mol.atoms.iter().enumerate() {
        if !removable[old_idx] {
            index_map[old_idx] = atoms.len();
            atoms.push(atom.clone());
        }
    }

    let mut bonds = Vec::with_capacity(mol.bond_count());
    for bond in &mol.bonds {
        let (h, parent) = if removable[bond.atom1] {
            (true, bond.atom2)
        } else if removable[bond.atom2] {
            (true, bond.atom1)
        } else {
            (false, 0)
        };
        if h {
            let parent = &mut atoms[index_map[parent]];
            parent.implicit_hydrogens = parent.implicit_hydrogens.saturating_add(1);
            continue;
        }
        bonds.push(Bond {
            atom1: index_map[bond.atom1],
            atom2: index_map[bond.atom2],
            ..bond.clone()
        });
    }

    Molecule::new(mol.name.clone(), atoms, bonds)
}
