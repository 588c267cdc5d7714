//! Kekulization and aromaticity perception.
//!
//! Parsed molecules are normalised in two steps: aromatic bonds are resolved
//! into alternating single and double bonds, then rings are marked aromatic
//! again by the Hückel 4n+2 rule. `c1ccccc1` and `C1=CC=CC=C1` therefore end
//! up as the same graph.

use molfp_core::{MolfpError, Result};

use crate::element::default_valences;
use crate::molecule::{BondOrder, Molecule};
use crate::ring;

/// Matching attempts allowed before an aromatic system is given up on.
const KEKULIZE_STEP_LIMIT: usize = 100_000;

/// Replace aromatic bonds with single and double bonds.
///
/// Every aromatic atom with a free valence must take exactly one double bond
/// to an aromatic neighbour that also has one. Aromatic flags on atoms and
/// bonds are cleared. Fails with [`MolfpError::Parse`] when no such assignment
/// exists, as for `c1cccc1`.
pub fn kekulize(mol: &mut Molecule) -> Result<()> {
    let needs_double: Vec<bool> = (0..mol.atom_count())
        .map(|i| mol.atoms[i].is_aromatic && has_free_valence(mol, i))
        .collect();
    let partners: Vec<Vec<(usize, usize)>> = (0..mol.atom_count())
        .map(|i| {
            if !needs_double[i] {
                return Vec::new();
            }
            mol.adjacency[i]
                .iter()
                .copied()
                .filter(|&(j, b)| needs_double[j] && mol.bonds[b].order == BondOrder::Aromatic)
                .collect()
        })
        .collect();

    let mut mate = vec![None; mol.atom_count()];
    let mut steps = 0;
    if !pair_up(&needs_double, &partners, &mut mate, &mut steps) {
        return Err(MolfpError::Parse("cannot kekulize aromatic system".into()));
    }

    for (idx, bond) in mol.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic {
            bond.order =
                if mate[bond.atom1] == Some(idx) { BondOrder::Double } else { BondOrder::Single };
        }
        bond.is_aromatic = false;
    }
    for atom in &mut mol.atoms {
        atom.is_aromatic = false;
    }
    Ok(())
}

/// Mark rings that satisfy the Hückel 4n+2 rule as aromatic.
///
/// Each SSSR ring is tested alone, then each pair of rings sharing a bond is
/// tested as one envelope (azulene passes only this way). Atoms and bonds of
/// aromatic rings are flagged and the bonds become [`BondOrder::Aromatic`].
/// Expects a kekulized graph with implicit hydrogens assigned.
pub fn perceive_aromaticity(mol: &mut Molecule) {
    let rings = ring::find_sssr(mol);
    if rings.is_empty() {
        return;
    }
    let cyclic = ring::cyclic_bond_flags(mol);
    let electrons: Vec<Option<usize>> =
        (0..mol.atom_count()).map(|i| pi_electrons(mol, i, &cyclic)).collect();
    let huckel = |atoms: &[usize]| {
        atoms.iter().map(|&i| electrons[i]).sum::<Option<usize>>().is_some_and(|n| n % 4 == 2)
    };

    let mut aromatic: Vec<bool> = rings.iter().map(|r| huckel(r.as_slice())).collect();
    for a in 0..rings.len() {
        for b in a + 1..rings.len() {
            if aromatic[a] && aromatic[b] {
                continue;
            }
            let shared = rings[a].iter().filter(|i| rings[b].contains(i)).count();
            if shared != 2 {
                continue;
            }
            let mut envelope = rings[a].clone();
            envelope.extend(rings[b].iter().filter(|i| !rings[a].contains(i)));
            if huckel(envelope.as_slice()) {
                aromatic[a] = true;
                aromatic[b] = true;
            }
        }
    }

    let aromatic_rings: Vec<Vec<usize>> =
        rings.into_iter().zip(aromatic).filter_map(|(r, keep)| keep.then_some(r)).collect();
    let flags = ring::ring_bond_flags(mol, &aromatic_rings);
    for (bond, flag) in mol.bonds.iter_mut().zip(flags) {
        if flag {
            bond.order = BondOrder::Aromatic;
            bond.is_aromatic = true;
        }
    }
    for &i in aromatic_rings.iter().flatten() {
        mol.atoms[i].is_aromatic = true;
    }
}

/// Whether the atom can take one more bond order than it has, counting
/// aromatic bonds as single and written hydrogens of bracket atoms.
fn has_free_valence(mol: &Molecule, i: usize) -> bool {
    let atom = &mol.atoms[i];
    let written_h = if atom.bracket { usize::from(atom.implicit_hydrogens) } else { 0 };
    let used = written_h
        + mol.adjacency[i].iter().map(|&(_, b)| mol.bonds[b].order.valence()).sum::<usize>();
    charged_valences(atom.atomic_number, atom.formal_charge)
        .iter()
        .find(|&&v| v >= used)
        .is_some_and(|&v| v > used)
}

/// Valences of the isoelectronic neutral element, so `[n+]` behaves like
/// carbon and `[c-]` like nitrogen.
fn charged_valences(atomic_number: u8, charge: i8) -> &'static [usize] {
    u8::try_from(i16::from(atomic_number) - i16::from(charge))
        .ok()
        .map(default_valences)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default_valences(atomic_number))
}

/// Pi electrons an atom donates to a ring it sits in; `None` when it breaks
/// conjugation (sp3 centres, triple bonds, exocyclic C=C).
fn pi_electrons(mol: &Molecule, i: usize, cyclic: &[bool]) -> Option<usize> {
    let mut exocyclic_hetero = false;
    for &(nbr, bond) in &mol.adjacency[i] {
        match mol.bonds[bond].order {
            BondOrder::Double if cyclic[bond] => return Some(1),
            BondOrder::Double if matches!(mol.atoms[nbr].atomic_number, 7 | 8 | 16) => {
                exocyclic_hetero = true;
            }
            BondOrder::Double | BondOrder::Triple => return None,
            BondOrder::Single | BondOrder::Aromatic => {}
        }
    }
    if exocyclic_hetero {
        return Some(0);
    }

    let atom = &mol.atoms[i];
    let connections = mol.degree(i) + usize::from(atom.implicit_hydrogens);
    match (atom.atomic_number, atom.formal_charge) {
        (7 | 15 | 33, 0) if connections == 3 => Some(2),
        (8 | 16 | 34 | 52, 0) if connections == 2 => Some(2),
        (6, -1) if connections == 3 => Some(2),
        (7, -1) if connections == 2 => Some(2),
        (5, 0) | (6, 1) if connections == 3 => Some(0),
        _ => None,
    }
}

/// Backtracking perfect matching over the atoms that need a double bond,
/// always extending the atom with the fewest free partners.
fn pair_up(
    needs_double: &[bool],
    partners: &[Vec<(usize, usize)>],
    mate: &mut [Option<usize>],
    steps: &mut usize,
) -> bool {
    let matched: &[Option<usize>] = mate;
    let next = (0..needs_double.len())
        .filter(|&i| needs_double[i] && matched[i].is_none())
        .min_by_key(|&i| free_partners(&partners[i], matched));
    let Some(atom) = next else {
        return true;
    };

    for &(nbr, bond) in &partners[atom] {
        if mate[nbr].is_some() {
            continue;
        }
        *steps += 1;
        if *steps > KEKULIZE_STEP_LIMIT {
            return false;
        }
        mate[atom] = Some(bond);
        mate[nbr] = Some(bond);
        if pair_up(needs_double, partners, mate, steps) {
            return true;
        }
        mate[atom] = None;
        mate[nbr] = None;
    }
    false
}

fn free_partners(partners: &[(usize, usize)], mate: &[Option<usize>]) -> usize {
    partners.iter().filter(|&&(j, _)| mate[j].is_none()).count()
}
