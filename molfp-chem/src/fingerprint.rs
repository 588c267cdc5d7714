//! Circular (Morgan/ECFP) fingerprints and similarity.

use crate::molecule::Molecule;
use crate::ring;

/// Packed bit vector of a fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    words: Vec<u64>,
    len: usize,
}

impl Fingerprint {
    /// All-zero fingerprint of `nbits` bits.
    pub fn new(nbits: usize) -> Self {
        Fingerprint { words: vec![0; nbits.div_ceil(64)], len: nbits }
    }

    /// Word index and mask of `pos`, which wraps modulo the length.
    fn locate(&self, pos: usize) -> (usize, u64) {
        let pos = pos % self.len;
        (pos / 64, 1 << (pos % 64))
    }

    pub fn set_bit(&mut self, pos: usize) {
        let (word, mask) = self.locate(pos);
        self.words[word] |= mask;
    }

    pub fn get_bit(&self, pos: usize) -> bool {
        let (word, mask) = self.locate(pos);
        self.words[word] & mask != 0
    }

    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn nbits(&self) -> usize {
        self.len
    }

    /// Positions of the set bits, ascending.
    pub fn on_bits(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get_bit(i))
    }

    /// Dense 0/1 vector of length `nbits`.
    pub fn to_vec(&self) -> Vec<u32> {
        (0..self.len).map(|i| u32::from(self.get_bit(i))).collect()
    }
}

/// 64-bit FNV-1a over little-endian `u64` words.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fnv1a(u64);

impl Fnv1a {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    pub(crate) fn new() -> Self {
        Fnv1a(Self::OFFSET)
    }

    pub(crate) fn write(self, value: u64) -> Self {
        let h = value
            .to_le_bytes()
            .iter()
            .fold(self.0, |h, &b| (h ^ u64::from(b)).wrapping_mul(Self::PRIME));
        Fnv1a(h)
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Atom environment identifiers of every radius from 0 to `radius`.
///
/// `result[r][i]` is the identifier of the environment of radius `r` centered
/// on atom `i`. Radius-0 identifiers hash the atom invariants (element, degree,
/// attached hydrogens, charge, isotope, ring membership, aromaticity); each
/// further iteration hashes the previous identifier with the sorted
/// (bond order, neighbor identifier) pairs.
pub fn morgan_environments(mol: &Molecule, radius: usize) -> Vec<Vec<u64>> {
    let in_ring = ring::ring_atom_flags(mol);
    let seed: Vec<u64> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            Fnv1a::new()
                .write(u64::from(atom.atomic_number))
                .write(mol.degree(i) as u64)
                .write(mol.total_hydrogens(i) as u64)
                .write(atom.formal_charge as u64)
                .write(u64::from(atom.isotope.unwrap_or(0)))
                .write(u64::from(in_ring[i]))
                .write(u64::from(atom.is_aromatic))
                .finish()
        })
        .collect();

    let mut layers = vec![seed];
    for round in 1..=radius {
        let prev = &layers[round - 1];
        let next = (0..mol.atom_count())
            .map(|i| {
                let mut nbrs: Vec<(u8, u64)> = mol.adjacency[i]
                    .iter()
                    .map(|&(j, bond)| (mol.bonds[bond].order as u8, prev[j]))
                    .collect();
                nbrs.sort_unstable();
                nbrs.into_iter()
                    .fold(Fnv1a::new().write(round as u64).write(prev[i]), |h, (order, id)| {
                        h.write(u64::from(order)).write(id)
                    })
                    .finish()
            })
            .collect();
        layers.push(next);
    }
    layers
}

/// Morgan bit fingerprint (ECFP) folded to `nbits`.
///
/// Radius 2 corresponds to ECFP4, radius 3 to ECFP6.
pub fn morgan_fingerprint(mol: &Molecule, radius: usize, nbits: usize) -> Fingerprint {
    let mut fp = Fingerprint::new(nbits);
    if nbits > 0 {
        for id in morgan_environments(mol, radius).into_iter().flatten() {
            fp.set_bit(fold_hash(id, nbits));
        }
    }
    fp
}

/// Hashed Morgan count vector (ECFC).
///
/// Every environment identifier increments the bucket it folds into, so a
/// fragment occurring `k` times contributes `k`. Collisions are not corrected.
pub fn morgan_counts(mol: &Molecule, radius: usize, nbits: usize) -> Vec<u32> {
    let mut counts = vec![0u32; nbits];
    if nbits > 0 {
        for id in morgan_environments(mol, radius).into_iter().flatten() {
            let bucket = &mut counts[fold_hash(id, nbits)];
            *bucket = bucket.saturating_add(1);
        }
    }
    counts
}

/// Tanimoto coefficient |A & B| / |A | B|; two empty fingerprints score 1.0.
///
/// # Panics
///
/// Panics if the fingerprints have different lengths.
pub fn tanimoto_similarity(fp1: &Fingerprint, fp2: &Fingerprint) -> f64 {
    assert_eq!(fp1.len, fp2.len, "fingerprints must have the same size");
    let (common, union) = fp1
        .words
        .iter()
        .zip(&fp2.words)
        .fold((0u32, 0u32), |(c, u), (a, b)| (c + (a & b).count_ones(), u + (a | b).count_ones()));
    if union == 0 {
        1.0
    } else {
        f64::from(common) / f64::from(union)
    }
}

/// Tanimoto similarity of `query` against each of `targets`.
pub fn tanimoto_bulk(query: &Fingerprint, targets: &[Fingerprint]) -> Vec<f64> {
    targets.iter().map(|t| tanimoto_similarity(query, t)).collect()
}

fn fold_hash(hash: u64, nbits: usize) -> usize {
    (hash % nbits as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrogens::add_explicit_hydrogens;
    use crate::smiles::parse_smiles;

    #[test]
    fn bits_wrap_and_count() {
        let mut fp = Fingerprint::new(100);
        fp.set_bit(42);
        fp.set_bit(163);
        assert!(fp.get_bit(42));
        assert!(fp.get_bit(63));
        assert!(!fp.get_bit(64));
        assert_eq!(fp.count_ones(), 2);
        assert_eq!(fp.on_bits().collect::<Vec<_>>(), vec![42, 63]);
        let dense = fp.to_vec();
        assert_eq!(dense.len(), 100);
        assert_eq!(dense.iter().sum::<u32>(), 2);
    }

    #[test]
    fn fnv_matches_reference_offset() {
        assert_eq!(Fnv1a::new().finish(), 0xcbf29ce484222325);
        assert_ne!(Fnv1a::new().write(1).finish(), Fnv1a::new().write(2).finish());
    }

    #[test]
    fn repeatable() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(morgan_fingerprint(&mol, 2, 2048), morgan_fingerprint(&mol, 2, 2048));
    }

    #[test]
    fn environments_have_one_layer_per_radius() {
        let mol = parse_smiles("CCO").unwrap();
        let layers = morgan_environments(&mol, 2);
        assert_eq!(layers.len(), 3);
        assert!(layers.iter().all(|l| l.len() == 3));
        // CH3 and CH2 differ already at radius 0
        assert_ne!(layers[0][0], layers[0][1]);
    }

    #[test]
    fn counts_agree_with_bits() {
        let mol = add_explicit_hydrogens(&parse_smiles("CCCC").unwrap());
        let bits = morgan_fingerprint(&mol, 2, 2048).to_vec();
        let counts = morgan_counts(&mol, 2, 2048);
        assert_eq!(counts.len(), 2048);
        for (b, c) in bits.iter().zip(&counts) {
            assert_eq!(*b == 1, *c > 0);
        }
        // The two methyl groups share every identifier
        assert!(counts.iter().any(|&c| c > 1));
        let total: u32 = counts.iter().sum();
        assert_eq!(total as usize, mol.atom_count() * 3);
    }

    #[test]
    fn tanimoto_bounds() {
        let benzene = morgan_fingerprint(&parse_smiles("c1ccccc1").unwrap(), 2, 2048);
        assert!((tanimoto_similarity(&benzene, &benzene) - 1.0).abs() < 1e-10);

        let ethanol = morgan_fingerprint(&parse_smiles("CCO").unwrap(), 2, 2048);
        let propanol = morgan_fingerprint(&parse_smiles("CCCO").unwrap(), 2, 2048);
        let sim = tanimoto_similarity(&ethanol, &propanol);
        assert!(sim > 0.0 && sim < 1.0, "tanimoto = {sim}");
        let bulk = tanimoto_bulk(&ethanol, &[ethanol.clone(), propanol]);
        assert!((bulk[0] - 1.0).abs() < 1e-10);
        assert!((bulk[1] - sim).abs() < 1e-10);
    }

    #[test]
    fn kekule_and_aromatic_spellings_agree() {
        let fp = |smiles: &str| {
            morgan_fingerprint(&add_explicit_hydrogens(&parse_smiles(smiles).unwrap()), 2, 2048)
        };
        assert_eq!(fp("C1=CC=CC=C1"), fp("c1ccccc1"));
        assert_eq!(fp("Cc1ccncc1"), fp("CC1=CC=NC=C1"));
    }

    #[test]
    fn linker_atoms_hash_as_chain_atoms() {
        // Same atoms, same degrees; only ring membership of the linker differs
        let linked = morgan_environments(&parse_smiles("C1CC1CCC1CC1").unwrap(), 0);
        let chain = morgan_environments(&parse_smiles("CCCC").unwrap(), 0);
        assert_eq!(linked[0][3], chain[0][1]);
    }

    #[test]
    fn empty_molecule() {
        let mol = parse_smiles("").unwrap();
        assert_eq!(morgan_environments(&mol, 2), vec![Vec::<u64>::new(); 3]);
        assert_eq!(morgan_fingerprint(&mol, 2, 64).count_ones(), 0);
        assert_eq!(morgan_counts(&mol, 2, 64), vec![0u32; 64]);
        assert_eq!(tanimoto_similarity(&Fingerprint::new(8), &Fingerprint::new(8)), 1.0);
    }
}
