//! MACCS 166-key structural fingerprints.
//!
//! MACCS (Molecular ACCess System) keys are one of the most widely used structural
//! fingerprint types. Each key is a presence test for one structural feature:
//! element classes, ring sizes, bond patterns, functional groups and a few
//! count thresholds. Keys are numbered 1 to 166 and stored at their own index,
//! so the fingerprint is 167 bits wide and bit 0 is never set.
//!
//! Patterns are matched on the heavy-atom graph. Hydrogens only enter through
//! per-atom hydrogen counts, which makes the result identical whether hydrogens
//! are implicit or present as explicit nodes.

use crate::fingerprint::Fingerprint;
use crate::molecule::{BondOrder, Molecule, HYDROGEN};
use crate::ring;

/// Width of a MACCS fingerprint: 166 keys plus the unused position 0.
pub const MACCS_WIDTH: usize = 167;

const C: u8 = 6;
const N: u8 = 7;
const O: u8 = 8;
const S: u8 = 16;
const HALOGENS: [u8; 4] = [9, 17, 35, 53];

/// Compute the MACCS 166-key structural fingerprint.
///
/// # Example
///
/// ```
/// use molfp_chem::{parse_smiles, maccs_fingerprint, MACCS_WIDTH};
///
/// let aspirin = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
/// let fp = maccs_fingerprint(&aspirin);
/// assert_eq!(fp.nbits(), MACCS_WIDTH);
/// assert!(fp.count_ones() > 10); // aspirin has many features
/// ```
pub fn maccs_fingerprint(mol: &Molecule) -> Fingerprint {
    let mut fp = Fingerprint::new(MACCS_WIDTH);
    if mol.heavy_atom_count() == 0 {
        return fp;
    }

    let ctx = Context::new(mol);
    for key in 1..MACCS_WIDTH {
        if key_matches(&ctx, key) {
            fp.set_bit(key);
        }
    }
    fp
}

/// Precomputed per-molecule data shared by every key.
struct Context<'a> {
    mol: &'a Molecule,
    hydrogens: Vec<usize>,
    rings: Vec<Vec<usize>>,
    ring_atoms: Vec<bool>,
    ring_bonds: Vec<bool>,
}

impl<'a> Context<'a> {
    fn new(mol: &'a Molecule) -> Self {
        let rings = ring::find_sssr(mol);
        let mut ring_atoms = vec![false; mol.atom_count()];
        for r in &rings {
            for &idx in r {
                ring_atoms[idx] = true;
            }
        }
        let ring_bonds = ring::ring_bond_flags(mol, &rings);
        let hydrogens = (0..mol.atom_count()).map(|i| mol.total_hydrogens(i)).collect();
        Context { mol, hydrogens, rings, ring_atoms, ring_bonds }
    }

    fn element(&self, idx: usize) -> u8 {
        self.mol.atoms[idx].atomic_number
    }

    fn any_element(&self, pred: impl Fn(u8) -> bool) -> bool {
        self.mol.atoms.iter().any(|a| a.atomic_number != HYDROGEN && pred(a.atomic_number))
    }

    fn count_atoms(&self, test: AtomTest) -> usize {
        (0..self.mol.atom_count()).filter(|&i| test(self, i)).count()
    }

    fn has_ring(&self, size: usize) -> bool {
        self.rings.iter().any(|r| r.len() == size)
    }

    fn has_ring_with(&self, size: usize, test: AtomTest) -> bool {
        self.rings.iter().any(|r| r.len() == size && r.iter().any(|&i| test(self, i)))
    }
}

type AtomTest = fn(&Context, usize) -> bool;

fn any(ctx: &Context, i: usize) -> bool {
    ctx.element(i) != HYDROGEN
}

fn hetero(ctx: &Context, i: usize) -> bool {
    let z = ctx.element(i);
    z != HYDROGEN && z != C
}

fn hetero_h(ctx: &Context, i: usize) -> bool {
    hetero(ctx, i) && ctx.hydrogens[i] > 0
}

fn carbon(ctx: &Context, i: usize) -> bool {
    ctx.element(i) == C
}

fn nitrogen(ctx: &Context, i: usize) -> bool {
    ctx.element(i) == N
}

fn oxygen(ctx: &Context, i: usize) -> bool {
    ctx.element(i) == O
}

fn sulfur(ctx: &Context, i: usize) -> bool {
    ctx.element(i) == S
}

fn halogen(ctx: &Context, i: usize) -> bool {
    HALOGENS.contains(&ctx.element(i))
}

fn aliphatic_carbon_with(ctx: &Context, i: usize, hs: &[usize]) -> bool {
    carbon(ctx, i) && !ctx.mol.atoms[i].is_aromatic && hs.contains(&ctx.hydrogens[i])
}

fn ch2(ctx: &Context, i: usize) -> bool {
    aliphatic_carbon_with(ctx, i, &[2])
}

fn ch3(ctx: &Context, i: usize) -> bool {
    aliphatic_carbon_with(ctx, i, &[3])
}

fn ch2_or_ch3(ctx: &Context, i: usize) -> bool {
    aliphatic_carbon_with(ctx, i, &[2, 3])
}

fn methyl(ctx: &Context, i: usize) -> bool {
    aliphatic_carbon_with(ctx, i, &[3, 4])
}

fn nh2(ctx: &Context, i: usize) -> bool {
    nitrogen(ctx, i) && !ctx.mol.atoms[i].is_aromatic && ctx.hydrogens[i] == 2
}

fn aromatic_carbon(ctx: &Context, i: usize) -> bool {
    carbon(ctx, i) && ctx.mol.atoms[i].is_aromatic
}

fn aromatic_nitrogen(ctx: &Context, i: usize) -> bool {
    nitrogen(ctx, i) && ctx.mol.atoms[i].is_aromatic
}

#[derive(Debug, Clone, Copy)]
enum BondTest {
    Any,
    Single,
    Double,
    Triple,
    Aromatic,
    SingleOrAromatic,
    NonAromatic,
    Ring,
    NonRing,
    RingDouble,
}

impl BondTest {
    fn matches(self, ctx: &Context, bond_idx: usize) -> bool {
        let order = ctx.mol.bonds[bond_idx].order;
        let in_ring = ctx.ring_bonds[bond_idx];
        match self {
            BondTest::Any => true,
            BondTest::Single => order == BondOrder::Single,
            BondTest::Double => order == BondOrder::Double,
            BondTest::Triple => order == BondOrder::Triple,
            BondTest::Aromatic => order == BondOrder::Aromatic,
            BondTest::SingleOrAromatic => matches!(order, BondOrder::Single | BondOrder::Aromatic),
            BondTest::NonAromatic => order != BondOrder::Aromatic,
            BondTest::Ring => in_ring,
            BondTest::NonRing => !in_ring,
            BondTest::RingDouble => in_ring && order == BondOrder::Double,
        }
    }
}

/// Count distinct atom sets matching a linear pattern, stopping at `limit`.
///
/// `atoms[k]` and `atoms[k + 1]` must be joined by a bond passing `bonds[k]`.
fn path_count(ctx: &Context, atoms: &[AtomTest], bonds: &[BondTest], limit: usize) -> usize {
    debug_assert_eq!(atoms.len(), bonds.len() + 1);
    let mut seen = Vec::new();
    let mut path = Vec::with_capacity(atoms.len());
    for start in 0..ctx.mol.atom_count() {
        if seen.len() >= limit {
            break;
        }
        if atoms[0](ctx, start) {
            path.push(start);
            extend_path(ctx, atoms, bonds, &mut path, &mut seen, limit);
            path.pop();
        }
    }
    seen.len()
}

fn extend_path(
    ctx: &Context,
    atoms: &[AtomTest],
    bonds: &[BondTest],
    path: &mut Vec<usize>,
    seen: &mut Vec<Vec<usize>>,
    limit: usize,
) {
    if seen.len() >= limit {
        return;
    }
    let depth = path.len();
    if depth == atoms.len() {
        record(seen, path);
        return;
    }
    let last = path[depth - 1];
    for &(nbr, bond_idx) in &ctx.mol.adjacency[last] {
        if path.contains(&nbr) || !bonds[depth - 1].matches(ctx, bond_idx) || !atoms[depth](ctx, nbr)
        {
            continue;
        }
        path.push(nbr);
        extend_path(ctx, atoms, bonds, path, seen, limit);
        path.pop();
    }
}

/// Whether some atom passing `center` has distinct neighbors matching every arm.
fn star_match(ctx: &Context, center: AtomTest, arms: &[(BondTest, AtomTest)]) -> bool {
    let mut used = Vec::with_capacity(arms.len());
    (0..ctx.mol.atom_count())
        .any(|c| center(ctx, c) && assign_arms(ctx, c, arms, &mut used))
}

fn assign_arms(
    ctx: &Context,
    center: usize,
    arms: &[(BondTest, AtomTest)],
    used: &mut Vec<usize>,
) -> bool {
    let Some(&(bond, atom)) = arms.get(used.len()) else {
        return true;
    };
    for &(nbr, bond_idx) in &ctx.mol.adjacency[center] {
        if used.contains(&nbr) || !bond.matches(ctx, bond_idx) || !atom(ctx, nbr) {
            continue;
        }
        used.push(nbr);
        if assign_arms(ctx, center, arms, used) {
            used.clear();
            return true;
        }
        used.pop();
    }
    false
}

fn record(seen: &mut Vec<Vec<usize>>, atoms: &[usize]) {
    let mut key = atoms.to_vec();
    key.sort_unstable();
    if !seen.contains(&key) {
        seen.push(key);
    }
}

fn has_path(ctx: &Context, atoms: &[AtomTest], bonds: &[BondTest]) -> bool {
    path_count(ctx, atoms, bonds, 1) > 0
}

fn has_two_paths(ctx: &Context, atoms: &[AtomTest], bonds: &[BondTest]) -> bool {
    path_count(ctx, atoms, bonds, 2) > 1
}

fn key_matches(ctx: &Context, key: usize) -> bool {
    use BondTest::{
        Any as B, Aromatic as Ar, Double as Db, NonAromatic as NAr, NonRing as NR, Ring as R,
        Single as Sg, SingleOrAromatic as SgAr, Triple as Tr,
    };
    let a: AtomTest = any;
    let q: AtomTest = hetero;
    let qh: AtomTest = hetero_h;
    let c: AtomTest = carbon;
    let n: AtomTest = nitrogen;
    let o: AtomTest = oxygen;
    let s: AtomTest = sulfur;
    let x: AtomTest = halogen;

    match key {
        1 => ctx.mol.atoms.iter().any(|at| at.isotope.is_some()),
        2 => ctx.any_element(|z| z > 103),
        3 => ctx.any_element(|z| [32, 33, 34, 50, 51, 52, 82, 83, 84].contains(&z)),
        4 => ctx.any_element(|z| (89..=103).contains(&z)),
        5 => ctx.any_element(|z| [21, 22, 39, 40, 72].contains(&z)),
        6 => ctx.any_element(|z| (57..=71).contains(&z)),
        7 => ctx.any_element(|z| [23, 24, 25, 41, 42, 43, 73, 74, 75].contains(&z)),
        8 => ctx.has_ring_with(4, q),
        9 => ctx.any_element(|z| [26, 27, 28, 44, 45, 46, 76, 77, 78].contains(&z)),
        10 => ctx.any_element(|z| [4, 12, 20, 38, 56, 88].contains(&z)),
        11 => ctx.has_ring(4),
        12 => ctx.any_element(|z| [29, 30, 47, 48, 79, 80].contains(&z)),
        13 => star_match(ctx, n, &[(B, o), (B, c), (B, c)]),
        14 => has_path(ctx, &[s, s], &[Sg]),
        15 => star_match(ctx, c, &[(B, o), (B, o), (B, o)]),
        16 => ctx.has_ring_with(3, q),
        17 => has_path(ctx, &[c, c], &[Tr]),
        18 => ctx.any_element(|z| [5, 13, 31, 49, 81].contains(&z)),
        19 => ctx.has_ring(7),
        20 => ctx.any_element(|z| z == 14),
        21 => star_match(ctx, c, &[(Db, c), (B, q), (B, q)]),
        22 => ctx.has_ring(3),
        23 => star_match(ctx, c, &[(B, n), (B, o), (B, o)]),
        24 => has_path(ctx, &[n, o], &[Sg]),
        25 => star_match(ctx, c, &[(B, n), (B, n), (B, n)]),
        26 => star_match(ctx, c, &[(BondTest::RingDouble, c), (R, a), (R, a)]),
        27 => ctx.any_element(|z| z == 53),
        28 => has_path(ctx, &[q, ch2, q], &[B, B]),
        29 => ctx.any_element(|z| z == 15),
        30 => star_match(ctx, q, &[(B, c), (B, c), (B, c), (B, a)]),
        31 => has_path(ctx, &[q, x], &[B]),
        32 => has_path(ctx, &[c, s, n], &[B, B]),
        33 => has_path(ctx, &[n, s], &[B]),
        34 => has_path(ctx, &[ch2, a], &[Db]),
        35 => ctx.any_element(|z| [3, 11, 19, 37, 55, 87].contains(&z)),
        36 => ctx.count_atoms(|ctx, i| sulfur(ctx, i) && ctx.ring_atoms[i]) > 0,
        37 => star_match(ctx, c, &[(B, n), (B, o), (B, n)]),
        38 => star_match(ctx, c, &[(B, n), (B, c), (B, n)]),
        39 => star_match(ctx, s, &[(B, o), (B, o), (B, o)]),
        40 => has_path(ctx, &[s, o], &[Sg]),
        41 => has_path(ctx, &[c, n], &[Tr]),
        42 => ctx.any_element(|z| z == 9),
        43 => has_path(ctx, &[qh, a, qh], &[B, B]),
        44 => ctx.any_element(|z| ![6, 7, 8, 9, 14, 15, 16, 17, 35, 53].contains(&z)),
        45 => has_path(ctx, &[c, c, n], &[Db, B]),
        46 => ctx.any_element(|z| z == 35),
        47 => has_path(ctx, &[s, a, n], &[B, B]),
        48 => star_match(ctx, q, &[(B, o), (B, o), (B, o)]),
        49 => ctx.mol.atoms.iter().any(|at| at.formal_charge != 0),
        50 => star_match(ctx, c, &[(Db, c), (B, c), (B, c)]),
        51 => has_path(ctx, &[c, s, o], &[B, B]),
        52 => has_path(ctx, &[n, n], &[B]),
        53 => has_path(ctx, &[qh, a, a, a, qh], &[B, B, B, B]),
        54 => has_path(ctx, &[qh, a, a, qh], &[B, B, B]),
        55 => has_path(ctx, &[o, s, o], &[B, B]),
        56 => star_match(ctx, n, &[(B, o), (B, o), (B, c)]),
        57 => ctx.count_atoms(|ctx, i| oxygen(ctx, i) && ctx.ring_atoms[i]) > 0,
        58 => has_path(ctx, &[q, s, q], &[B, B]),
        59 => has_path(ctx, &[s, a, a], &[NAr, Ar]),
        60 => has_path(ctx, &[s, o], &[Db]),
        61 => star_match(ctx, s, &[(B, a), (B, a), (B, a)]),
        62 => has_path(ctx, &[a, a, a, a], &[R, NR, R]),
        63 => has_path(ctx, &[n, o], &[Db]),
        64 => has_path(ctx, &[a, a, s], &[R, NR]),
        65 => has_path(ctx, &[aromatic_carbon, aromatic_nitrogen], &[Ar]),
        66 => star_match(ctx, c, &[(B, c), (B, c), (B, c), (B, a)]),
        67 => has_path(ctx, &[q, s], &[B]),
        68 => has_path(ctx, &[qh, qh], &[B]),
        69 => has_path(ctx, &[q, qh], &[B]),
        70 => has_path(ctx, &[q, n, q], &[B, B]),
        71 => has_path(ctx, &[n, o], &[B]),
        72 => has_path(ctx, &[o, a, a, o], &[B, B, B]),
        73 => has_path(ctx, &[s, a], &[Db]),
        74 => has_path(ctx, &[ch3, a, ch3], &[B, B]),
        75 => has_path(ctx, &[a, n, a], &[NR, R]),
        76 => star_match(ctx, c, &[(Db, c), (B, a), (B, a)]),
        77 => has_path(ctx, &[n, a, n], &[B, B]),
        78 => has_path(ctx, &[c, n], &[Db]),
        79 => has_path(ctx, &[n, a, a, n], &[B, B, B]),
        80 => has_path(ctx, &[n, a, a, a, n], &[B, B, B, B]),
        81 => star_match(ctx, a, &[(B, s), (B, a), (B, a)]),
        82 => has_path(ctx, &[a, ch2, qh], &[B, B]),
        83 => ctx.has_ring_with(5, q),
        84 => ctx.count_atoms(nh2) > 0,
        85 => star_match(ctx, n, &[(B, c), (B, c), (B, c)]),
        86 => has_path(ctx, &[ch2_or_ch3, q, ch2_or_ch3], &[SgAr, SgAr]),
        87 => has_path(ctx, &[x, a, a], &[NR, R]),
        88 => ctx.any_element(|z| z == S),
        89 => has_path(ctx, &[o, a, a, a, o], &[B, B, B, B]),
        90 => has_path(ctx, &[qh, a, a, ch2, a], &[B, B, B, B]),
        91 => has_path(ctx, &[qh, a, a, a, ch2, a], &[B, B, B, B, B]),
        92 => star_match(ctx, c, &[(B, o), (B, n), (B, c)]),
        93 => has_path(ctx, &[q, ch3], &[B]),
        94 => has_path(ctx, &[q, n], &[B]),
        95 => has_path(ctx, &[n, a, a, o], &[B, B, B]),
        96 => ctx.has_ring(5),
        97 => has_path(ctx, &[n, a, a, a, o], &[B, B, B, B]),
        98 => ctx.has_ring_with(6, q),
        99 => has_path(ctx, &[c, c], &[Db]),
        100 => has_path(ctx, &[a, ch2, n], &[B, B]),
        101 => ctx.rings.iter().any(|r| r.len() >= 8),
        102 => has_path(ctx, &[q, o], &[B]),
        103 => ctx.any_element(|z| z == 17),
        104 => has_path(ctx, &[qh, a, ch2, a], &[B, B, B]),
        105 => star_match(ctx, a, &[(R, a), (R, a), (R, a)]),
        106 => star_match(ctx, a, &[(B, q), (B, q), (B, q)]),
        107 => star_match(ctx, a, &[(B, x), (B, a), (B, a)]),
        108 => has_path(ctx, &[ch3, a, a, a, ch2, a], &[B, B, B, B, B]),
        109 => has_path(ctx, &[a, ch2, o], &[B, B]),
        110 => has_path(ctx, &[n, c, o], &[B, B]),
        111 => has_path(ctx, &[n, a, ch2, a], &[B, B, B]),
        112 => star_match(ctx, a, &[(B, a), (B, a), (B, a), (B, a)]),
        113 => has_path(ctx, &[o, a, a], &[NAr, Ar]),
        114 => has_path(ctx, &[ch3, ch2, a], &[B, B]),
        115 => has_path(ctx, &[ch3, a, ch2, a], &[B, B, B]),
        116 => has_path(ctx, &[ch3, a, a, ch2, a], &[B, B, B, B]),
        117 => has_path(ctx, &[n, a, o], &[B, B]),
        118 => has_two_paths(ctx, &[a, ch2, ch2, a], &[B, B, B]),
        119 => has_path(ctx, &[n, a], &[Db]),
        120 => ctx.count_atoms(|ctx, i| hetero(ctx, i) && ctx.ring_atoms[i]) > 1,
        121 => ctx.count_atoms(|ctx, i| nitrogen(ctx, i) && ctx.ring_atoms[i]) > 0,
        122 => star_match(ctx, n, &[(B, a), (B, a), (B, a)]),
        123 => has_path(ctx, &[o, c, o], &[B, B]),
        124 => has_path(ctx, &[q, q], &[B]),
        125 => {
            let aromatic_rings = ctx
                .rings
                .iter()
                .filter(|r| r.iter().all(|&i| ctx.mol.atoms[i].is_aromatic))
                .count();
            aromatic_rings > 1
        }
        126 => has_path(ctx, &[a, o, a], &[NR, NR]),
        127 => has_two_paths(ctx, &[a, a, o], &[R, NR]),
        128 => has_path(ctx, &[a, ch2, a, a, a, ch2, a], &[B, B, B, B, B, B]),
        129 => has_path(ctx, &[a, ch2, a, a, ch2, a], &[B, B, B, B, B]),
        130 => has_two_paths(ctx, &[q, q], &[B]),
        131 => ctx.count_atoms(qh) > 1,
        132 => has_path(ctx, &[o, a, ch2, a], &[B, B, B]),
        133 => has_path(ctx, &[a, a, n], &[R, NR]),
        134 => ctx.any_element(|z| HALOGENS.contains(&z)),
        135 => has_path(ctx, &[n, a, a], &[NAr, Ar]),
        136 => has_two_paths(ctx, &[o, a], &[Db]),
        137 => ctx.count_atoms(|ctx, i| hetero(ctx, i) && ctx.ring_atoms[i]) > 0,
        138 => has_two_paths(ctx, &[q, ch2, a], &[B, B]),
        139 => ctx.count_atoms(|ctx, i| oxygen(ctx, i) && ctx.hydrogens[i] > 0) > 0,
        140 => ctx.count_atoms(o) > 3,
        141 => ctx.count_atoms(ch3) > 2,
        142 => ctx.count_atoms(n) > 1,
        143 => has_path(ctx, &[a, a, o], &[R, NR]),
        144 => has_path(ctx, &[a, a, a, a], &[NAr, Ar, NAr]),
        145 => ctx.rings.iter().filter(|r| r.len() == 6).count() > 1,
        146 => ctx.count_atoms(o) > 2,
        147 => has_path(ctx, &[a, ch2, ch2, a], &[B, B, B]),
        148 => star_match(ctx, q, &[(B, a), (B, a), (B, a)]),
        149 => ctx.count_atoms(methyl) > 1,
        150 => has_path(ctx, &[a, a, a, a], &[NR, R, NR]),
        151 => ctx.count_atoms(|ctx, i| nitrogen(ctx, i) && ctx.hydrogens[i] > 0) > 0,
        152 => star_match(ctx, c, &[(B, o), (B, c), (B, c)]),
        153 => has_path(ctx, &[q, ch2, a], &[B, B]),
        154 => has_path(ctx, &[c, o], &[Db]),
        155 => has_path(ctx, &[a, ch2, a], &[NR, NR]),
        156 => star_match(ctx, a, &[(B, n), (B, a), (B, a)]),
        157 => has_path(ctx, &[c, o], &[Sg]),
        158 => has_path(ctx, &[c, n], &[Sg]),
        159 => ctx.count_atoms(o) > 1,
        160 => ctx.count_atoms(methyl) > 0,
        161 => ctx.count_atoms(n) > 0,
        162 => ctx.mol.atoms.iter().any(|at| at.is_aromatic),
        163 => ctx.has_ring(6),
        164 => ctx.count_atoms(o) > 0,
        165 => ctx.ring_atoms.iter().any(|&r| r),
        166 => ctx.mol.fragment_count() > 1,
        _ => false,
    }
}
