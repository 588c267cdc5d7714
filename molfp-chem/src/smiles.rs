//! SMILES string parser.
//!
//! Parsing runs in two stages: a `Lexer` splits the text into atoms, bond
//! symbols, branch and ring-closure tokens, and a `GraphBuilder` wires them
//! into atoms and bonds. Aromatic input is then kekulized, implicit hydrogens
//! are assigned from the default valences, and aromaticity is perceived anew
//! so that Kekulé and aromatic spellings give the same graph.

use std::collections::BTreeMap;
use std::fmt::Display;

use molfp_core::{MolfpError, Result};

use crate::aromaticity;
use crate::element::{default_valences, element_by_number, element_by_symbol};
use crate::molecule::{Bond, BondOrder, BondStereo, Chirality, MolAtom, Molecule};
use crate::ring;

/// Parse a SMILES string into a `Molecule`.
///
/// An empty string parses to an empty molecule. Syntax errors, atoms whose
/// explicit valence exceeds every allowed valence and aromatic systems that
/// cannot be kekulized are all reported as [`MolfpError::Parse`].
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a `Molecule` with a given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let mut lexer = Lexer { text: smiles.trim().as_bytes(), pos: 0 };
    let mut builder = GraphBuilder::default();
    while let Some((pos, token)) = lexer.next_token()? {
        builder.accept(token).map_err(|msg| parse_error(msg, pos))?;
    }
    let (atoms, bonds) = builder.finish()?;

    let mut mol = Molecule::new(name.to_string(), atoms, bonds);
    check_aromatic_atoms(&mol)?;
    aromaticity::kekulize(&mut mol)?;
    assign_implicit_hydrogens(&mut mol.atoms, &mol.bonds)?;
    aromaticity::perceive_aromaticity(&mut mol);
    Ok(mol)
}

fn parse_error(msg: impl Display, pos: usize) -> MolfpError {
    MolfpError::Parse(format!("{msg} at position {pos}"))
}

#[derive(Debug)]
enum Token {
    Atom(MolAtom),
    Bond(BondOrder, BondStereo),
    BranchOpen,
    BranchClose,
    RingBond(u16),
    Dot,
}

struct Lexer<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: u8) -> bool {
        let hit = self.peek() == Some(c);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn digit(&mut self) -> Option<u8> {
        let d = self.peek().filter(u8::is_ascii_digit)?;
        self.pos += 1;
        Some(d - b'0')
    }

    fn number(&mut self) -> Option<u32> {
        let mut value = u32::from(self.digit()?);
        while let Some(d) = self.digit() {
            value = value.saturating_mul(10).saturating_add(u32::from(d));
        }
        Some(value)
    }

    fn error(&self, msg: impl Display) -> MolfpError {
        parse_error(msg, self.pos)
    }

    /// The next token and the position it starts at.
    fn next_token(&mut self) -> Result<Option<(usize, Token)>> {
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let token = match c {
            b'(' => Token::BranchOpen,
            b')' => Token::BranchClose,
            b'.' => Token::Dot,
            b'-' => Token::Bond(BondOrder::Single, BondStereo::None),
            b'=' => Token::Bond(BondOrder::Double, BondStereo::None),
            b'#' => Token::Bond(BondOrder::Triple, BondStereo::None),
            b':' => Token::Bond(BondOrder::Aromatic, BondStereo::None),
            b'/' => Token::Bond(BondOrder::Single, BondStereo::Up),
            b'\\' => Token::Bond(BondOrder::Single, BondStereo::Down),
            b'0'..=b'9' => Token::RingBond(u16::from(c - b'0')),
            b'%' => match (self.digit(), self.digit()) {
                (Some(a), Some(b)) => Token::RingBond(u16::from(a) * 10 + u16::from(b)),
                _ => return Err(self.error("expected two digits after '%'")),
            },
            b'[' => Token::Atom(self.bracket_atom()?),
            _ => match self.organic_atom(c) {
                Some(atom) => Token::Atom(atom),
                None => return Err(parse_error(format!("unexpected character '{}'", c as char), start)),
            },
        };
        Ok(Some((start, token)))
    }

    /// Organic-subset atom starting with `c`; hydrogens are assigned later.
    fn organic_atom(&mut self, c: u8) -> Option<MolAtom> {
        let (atomic_number, is_aromatic) = match c {
            b'B' => (if self.eat(b'r') { 35 } else { 5 }, false),
            b'C' => (if self.eat(b'l') { 17 } else { 6 }, false),
            b'N' => (7, false),
            b'O' => (8, false),
            b'P' => (15, false),
            b'S' => (16, false),
            b'F' => (9, false),
            b'I' => (53, false),
            b'b' => (5, true),
            b'c' => (6, true),
            b'n' => (7, true),
            b'o' => (8, true),
            b'p' => (15, true),
            b's' => (16, true),
            _ => return None,
        };
        Some(MolAtom { is_aromatic, ..MolAtom::new(atomic_number) })
    }

    /// `[` isotope? symbol chirality? hcount? charge? class? `]`, after the `[`.
    fn bracket_atom(&mut self) -> Result<MolAtom> {
        let isotope = self.number().map(|n| u16::try_from(n).unwrap_or(u16::MAX));

        let first = self
            .bump()
            .filter(u8::is_ascii_alphabetic)
            .ok_or_else(|| self.error("expected element symbol in bracket atom"))?;
        let is_aromatic = first.is_ascii_lowercase();
        let head = first.to_ascii_uppercase() as char;
        let two_letter = self
            .peek()
            .filter(u8::is_ascii_lowercase)
            .and_then(|second| element_by_symbol(&format!("{head}{}", second as char)));
        let element = match two_letter {
            Some(element) => {
                self.pos += 1;
                element
            }
            None => element_by_symbol(&head.to_string())
                .ok_or_else(|| self.error(format!("unknown element '{head}'")))?,
        };

        let chirality = match (self.eat(b'@'), self.eat(b'@')) {
            (true, true) => Chirality::Clockwise,
            (true, false) => Chirality::CounterClockwise,
            _ => Chirality::None,
        };
        let hydrogens = if self.eat(b'H') { self.digit().unwrap_or(1) } else { 0 };
        let formal_charge = self.charge();
        if self.eat(b':') && self.number().is_none() {
            return Err(self.error("expected atom class number after ':'"));
        }
        if !self.eat(b']') {
            return Err(self.error("expected ']' to close bracket atom"));
        }

        Ok(MolAtom {
            atomic_number: element.atomic_number,
            formal_charge,
            isotope,
            is_aromatic,
            implicit_hydrogens: hydrogens,
            chirality,
            bracket: true,
        })
    }

    /// `+`, `-`, `+n`, `-n`, or repeated signs (`++` is +2).
    fn charge(&mut self) -> i8 {
        let (symbol, sign) = match self.peek() {
            Some(b'+') => (b'+', 1i8),
            Some(b'-') => (b'-', -1i8),
            _ => return 0,
        };
        self.pos += 1;
        if let Some(d) = self.digit() {
            return sign * d as i8;
        }
        let mut charge = sign;
        while self.eat(symbol) {
            charge = charge.saturating_add(sign);
        }
        charge
    }
}

type PendingBond = (BondOrder, BondStereo);

/// Connects tokens into a graph.
#[derive(Default)]
struct GraphBuilder {
    atoms: Vec<MolAtom>,
    bonds: Vec<Bond>,
    /// The atom the next atom bonds to.
    last: Option<usize>,
    /// Branch points of the open `(`.
    branches: Vec<usize>,
    /// Ring-closure number -> (opening atom, bond written at the opening).
    open_rings: BTreeMap<u16, (usize, Option<PendingBond>)>,
    /// Bond symbol waiting for its second atom.
    pending: Option<PendingBond>,
}

impl GraphBuilder {
    fn accept(&mut self, token: Token) -> std::result::Result<(), &'static str> {
        match token {
            Token::Atom(atom) => {
                let idx = self.atoms.len();
                self.atoms.push(atom);
                let written_bond = self.pending.take();
                if let Some(prev) = self.last {
                    self.connect(prev, idx, written_bond);
                }
                self.last = Some(idx);
            }
            Token::Bond(order, stereo) => {
                if self.pending.is_some() {
                    return Err("two consecutive bond symbols");
                }
                self.pending = Some((order, stereo));
            }
            Token::BranchOpen => {
                let from = self.last.ok_or("branch without preceding atom")?;
                self.branches.push(from);
            }
            Token::BranchClose => {
                if self.pending.is_some() {
                    return Err("bond symbol before ')'");
                }
                self.last = Some(self.branches.pop().ok_or("unmatched ')'")?);
            }
            Token::Dot => {
                if self.pending.is_some() {
                    return Err("bond symbol before '.'");
                }
                self.last = None;
            }
            Token::RingBond(number) => self.ring_bond(number)?,
        }
        Ok(())
    }

    fn ring_bond(&mut self, number: u16) -> std::result::Result<(), &'static str> {
        let here = self.last.ok_or("ring closure without preceding atom")?;
        let written = self.pending.take();
        let Some((partner, opened_with)) = self.open_rings.remove(&number) else {
            self.open_rings.insert(number, (here, written));
            return Ok(());
        };

        if partner == here {
            return Err("ring closure bonds an atom to itself");
        }
        let duplicate = self.bonds.iter().any(|b| {
            (b.atom1 == partner && b.atom2 == here) || (b.atom1 == here && b.atom2 == partner)
        });
        if duplicate {
            return Err("ring closure duplicates an existing bond");
        }
        let written_bond = match (written, opened_with) {
            (Some(a), Some(b)) if a.0 != b.0 => return Err("conflicting ring closure bond orders"),
            (Some(a), _) => Some(a),
            (None, b) => b,
        };
        self.connect(partner, here, written_bond);
        Ok(())
    }

    /// Bond two atoms; an unwritten bond is aromatic between aromatic atoms
    /// and single otherwise.
    fn connect(&mut self, a: usize, b: usize, bond: Option<PendingBond>) {
        let aromatic = self.atoms[a].is_aromatic && self.atoms[b].is_aromatic;
        let default_order = if aromatic { BondOrder::Aromatic } else { BondOrder::Single };
        let (order, stereo) = bond.unwrap_or((default_order, BondStereo::None));
        self.bonds.push(Bond {
            atom1: a,
            atom2: b,
            order,
            is_aromatic: aromatic && order == BondOrder::Aromatic,
            stereo,
        });
    }

    fn finish(self) -> Result<(Vec<MolAtom>, Vec<Bond>)> {
        if self.pending.is_some() {
            return Err(MolfpError::Parse("SMILES ends with a bond symbol".into()));
        }
        if !self.open_rings.is_empty() {
            let open: Vec<_> = self.open_rings.keys().collect();
            return Err(MolfpError::Parse(format!("unmatched ring closure(s): {open:?}")));
        }
        if !self.branches.is_empty() {
            return Err(MolfpError::Parse(format!(
                "{} unmatched '(' in SMILES",
                self.branches.len()
            )));
        }
        Ok((self.atoms, self.bonds))
    }
}

/// Fill in hydrogen counts of organic-subset atoms and check valences.
///
/// Runs on the kekulized graph. Organic atoms take the smallest allowed
/// valence that fits their bonds. Bracket atoms keep their written hydrogen
/// count and are only checked when neutral.
fn assign_implicit_hydrogens(atoms: &mut [MolAtom], bonds: &[Bond]) -> Result<()> {
    let mut used = vec![0usize; atoms.len()];
    for bond in bonds {
        used[bond.atom1] += bond.order.valence();
        used[bond.atom2] += bond.order.valence();
    }

    for (i, atom) in atoms.iter_mut().enumerate() {
        let valences = default_valences(atom.atomic_number);
        if atom.bracket {
            let total = used[i] + atom.implicit_hydrogens as usize;
            if atom.formal_charge == 0 && valences.last().is_some_and(|&max| total > max) {
                return Err(valence_error(i, atom.atomic_number, total));
            }
            continue;
        }
        if valences.is_empty() {
            continue;
        }

        let target = valences
            .iter()
            .find(|&&v| v >= used[i])
            .ok_or_else(|| valence_error(i, atom.atomic_number, used[i]))?;
        atom.implicit_hydrogens = (target - used[i]) as u8;
    }
    Ok(())
}

/// Lowercase atoms must sit in a ring.
fn check_aromatic_atoms(mol: &Molecule) -> Result<()> {
    if !mol.atoms.iter().any(|a| a.is_aromatic) {
        return Ok(());
    }
    let in_ring = ring::ring_atom_flags(mol);
    match (0..mol.atom_count()).find(|&i| mol.atoms[i].is_aromatic && !in_ring[i]) {
        Some(i) => Err(MolfpError::Parse(format!("non-ring atom {i} marked aromatic"))),
        None => Ok(()),
    }
}

fn valence_error(atom_idx: usize, atomic_number: u8, valence: usize) -> MolfpError {
    let symbol = element_by_number(atomic_number).map_or("?", |e| e.symbol);
    MolfpError::Parse(format!(
        "explicit valence for atom {atom_idx} {symbol}, {valence}, is greater than permitted"
    ))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for valid simple SMILES: chains of aliphatic organic subset atoms
    fn simple_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O"), Just("S")];
        proptest::collection::vec(atoms, 1..=20).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn parse_smiles_does_not_panic(s in "\\PC{0,100}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn descriptors_accept_every_parsed_molecule(s in "[cnosCNO1-3()=#\\[\\]H+-]{0,30}") {
            if let Ok(mol) = parse_smiles(&s) {
                let mol = crate::add_explicit_hydrogens(&mol);
                prop_assert_eq!(crate::morgan_fingerprint(&mol, 2, 64).nbits(), 64);
                prop_assert_eq!(crate::morgan_counts(&mol, 2, 64).len(), 64);
                prop_assert_eq!(crate::maccs_fingerprint(&mol).nbits(), crate::MACCS_WIDTH);
                let minhash = crate::MhfpEncoder::new(16).secfp_minhash(&mol, 3, 64);
                prop_assert_eq!(minhash.len(), 16);
            }
        }

        #[test]
        fn chains_always_parse(smi in simple_smiles()) {
            let mol = parse_smiles(&smi).unwrap();
            prop_assert_eq!(mol.atom_count(), smi.len());
            prop_assert_eq!(mol.bond_count(), smi.len() - 1);
        }
    }
}
