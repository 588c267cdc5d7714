//! MinHash fingerprints over circular substructure shingles (MHFP/SECFP).
//!
//! A molecule is reduced to a set of shingles: the circular environment of
//! every atom at each radius from 1 to `radius`, plus one shingle per SSSR
//! ring. Shingles are hashed to 32 bits with SHA-256. The SECFP is that hash
//! set folded into a fixed-length bit vector; the MinHash signature keeps, for
//! each of `n` seeded permutations, the minimum permuted hash of the set.

use sha2::{Digest, Sha256};

use crate::fingerprint::{morgan_environments, Fingerprint, Fnv1a};
use crate::molecule::Molecule;
use crate::ring;

/// Seed used by [`MhfpEncoder::new`].
pub const DEFAULT_SEED: u64 = 42;

const MERSENNE_PRIME: u64 = (1 << 61) - 1;
const MAX_HASH: u64 = (1 << 32) - 1;

/// Seeded MinHash encoder with a fixed number of permutations.
///
/// # Example
///
/// ```
/// use molfp_chem::{parse_smiles, MhfpEncoder};
///
/// let encoder = MhfpEncoder::new(128);
/// let mol = parse_smiles("CCO").unwrap();
/// let signature = encoder.encode(&mol, 3);
/// assert_eq!(signature.len(), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MhfpEncoder {
    seed: u64,
    a: Vec<u64>,
    b: Vec<u64>,
}

impl MhfpEncoder {
    /// Encoder with `n_permutations` permutations and the default seed.
    pub fn new(n_permutations: usize) -> Self {
        Self::with_seed(n_permutations, DEFAULT_SEED)
    }

    /// Encoder whose permutation parameters are drawn from `seed`.
    pub fn with_seed(n_permutations: usize, seed: u64) -> Self {
        let mut state = seed;
        let mut a = Vec::with_capacity(n_permutations);
        let mut b = Vec::with_capacity(n_permutations);
        for _ in 0..n_permutations {
            a.push(1 + splitmix64(&mut state) % (MERSENNE_PRIME - 1));
            b.push(splitmix64(&mut state) % MERSENNE_PRIME);
        }
        MhfpEncoder { seed, a, b }
    }

    /// Number of permutations, which is the signature length.
    pub fn n_permutations(&self) -> usize {
        self.a.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// MinHash signature of a set of 32-bit hashes.
    ///
    /// An empty set yields the maximum hash value in every position.
    pub fn hash_values(&self, values: &[u32]) -> Vec<u32> {
        self.a
            .iter()
            .zip(&self.b)
            .map(|(&a, &b)| {
                values.iter().map(|&v| permute(a, b, v)).min().unwrap_or(MAX_HASH) as u32
            })
            .collect()
    }

    /// MinHash signature of the molecule's shingle set (MHFP).
    pub fn encode(&self, mol: &Molecule, radius: usize) -> Vec<u32> {
        self.hash_values(&shingle_hashes(mol, radius))
    }

    /// MinHash signature of the folded SECFP of the molecule.
    ///
    /// The shingle hashes are first folded into `length` bits; the positions of
    /// the set bits form the hashed set.
    pub fn secfp_minhash(&self, mol: &Molecule, radius: usize, length: usize) -> Vec<u32> {
        let folded: Vec<u32> = secfp(mol, radius, length).on_bits().map(|pos| pos as u32).collect();
        self.hash_values(&folded)
    }
}

/// Shingle identifiers of a molecule, sorted and deduplicated.
pub fn shingling(mol: &Molecule, radius: usize) -> Vec<u64> {
    let layers = morgan_environments(mol, radius);
    let first = if radius == 0 { 0 } else { 1 };

    let mut shingles: Vec<u64> = layers[first..].iter().flatten().copied().collect();

    for r in ring::find_sssr(mol) {
        let mut members: Vec<u64> = r.iter().map(|&i| layers[0][i]).collect();
        members.sort_unstable();
        let h = members.into_iter().fold(Fnv1a::new().write(r.len() as u64), Fnv1a::write);
        shingles.push(h.finish());
    }

    shingles.sort_unstable();
    shingles.dedup();
    shingles
}

/// 32-bit SHA-256 hashes of the molecule's shingles.
pub fn shingle_hashes(mol: &Molecule, radius: usize) -> Vec<u32> {
    shingling(mol, radius).into_iter().map(hash_shingle).collect()
}

/// SMILES extended connectivity fingerprint: shingle hashes folded into `length` bits.
pub fn secfp(mol: &Molecule, radius: usize, length: usize) -> Fingerprint {
    let mut fp = Fingerprint::new(length);
    if length == 0 {
        return fp;
    }
    for h in shingle_hashes(mol, radius) {
        fp.set_bit(h as usize % length);
    }
    fp
}

/// Estimated Jaccard similarity of two MinHash signatures.
///
/// # Panics
///
/// Panics if the signatures have different lengths.
pub fn jaccard(a: &[u32], b: &[u32]) -> f64 {
    assert_eq!(a.len(), b.len(), "signatures must have the same length");
    if a.is_empty() {
        return 1.0;
    }
    let equal = a.iter().zip(b).filter(|(x, y)| x == y).count();
    equal as f64 / a.len() as f64
}

fn hash_shingle(shingle: u64) -> u32 {
    let digest = Sha256::digest(shingle.to_le_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

fn permute(a: u64, b: u64, value: u32) -> u64 {
    let x = (a as u128 * value as u128 + b as u128) % MERSENNE_PRIME as u128;
    (x as u64) & MAX_HASH
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
