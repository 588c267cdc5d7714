//! Molecular graph representation.

use molfp_core::{Annotated, Summarizable};

/// Atomic number of hydrogen.
pub const HYDROGEN: u8 = 1;

/// Tetrahedral chirality marker of a bracket atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// `@`
    CounterClockwise,
    /// `@@`
    Clockwise,
}

/// Cis-trans direction written on a single bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    /// `/`
    Up,
    /// `\`
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Valence the bond uses on each end; aromatic bonds count as one.
    pub fn valence(self) -> usize {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// A graph node.
///
/// `implicit_hydrogens` counts hydrogens that are not graph nodes; after
/// [`add_explicit_hydrogens`](crate::add_explicit_hydrogens) it is zero
/// everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
    pub chirality: Chirality,
    /// Written in brackets, so the hydrogen count was given explicitly.
    pub bracket: bool,
}

impl MolAtom {
    /// Neutral, non-aromatic atom of the given element without hydrogens.
    pub fn new(atomic_number: u8) -> Self {
        MolAtom { atomic_number, ..Default::default() }
    }

    pub fn hydrogen() -> Self {
        MolAtom::new(HYDROGEN)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == HYDROGEN
    }

    /// Uncharged, non-isotopic hydrogen, which can be folded into an implicit count.
    pub fn is_plain_hydrogen(&self) -> bool {
        self.is_hydrogen() && self.formal_charge == 0 && self.isotope.is_none()
    }
}

/// An edge between `atom1` and `atom2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    /// Set only for aromatic-order bonds between two aromatic atoms.
    pub is_aromatic: bool,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Bond {
            atom1,
            atom2,
            order,
            is_aromatic: order == BondOrder::Aromatic,
            stereo: BondStereo::None,
        }
    }
}

/// Atoms, bonds, and per-atom `(neighbor, bond index)` adjacency.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    pub fn new(name: String, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, idx));
            adjacency[bond.atom2].push((bond.atom1, idx));
        }
        Molecule { name, atoms, bonds, adjacency }
    }

    /// Number of graph nodes, explicit hydrogens included.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    /// Number of graph neighbors, explicit hydrogens included.
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Hydrogen graph nodes bonded to an atom.
    pub fn explicit_hydrogens(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].iter().filter(|&&(n, _)| self.atoms[n].is_hydrogen()).count()
    }

    /// Hydrogens on an atom, implicit and explicit.
    pub fn total_hydrogens(&self, atom_idx: usize) -> usize {
        usize::from(self.atoms[atom_idx].implicit_hydrogens) + self.explicit_hydrogens(atom_idx)
    }

    /// Hydrogens in the whole molecule, implicit and explicit.
    pub fn total_hydrogen_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|a| usize::from(a.implicit_hydrogens) + usize::from(a.is_hydrogen()))
            .sum()
    }

    /// Number of connected components.
    pub fn fragment_count(&self) -> usize {
        let mut component: Vec<Option<usize>> = vec![None; self.atom_count()];
        let mut count = 0;
        for root in 0..self.atom_count() {
            if component[root].is_some() {
                continue;
            }
            component[root] = Some(count);
            let mut frontier = vec![root];
            while let Some(atom) = frontier.pop() {
                for &(nbr, _) in &self.adjacency[atom] {
                    if component[nbr].is_none() {
                        component[nbr] = Some(count);
                        frontier.push(nbr);
                    }
                }
            }
            count += 1;
        }
        count
    }
}

impl Annotated for Molecule {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Summarizable for Molecule {
    fn summary(&self) -> String {
        let name = if self.name.is_empty() { "Molecule" } else { &self.name };
        format!("{name}: {} atoms, {} bonds", self.atom_count(), self.bond_count())
    }
}
