//! Periodic table symbols and element lookup.

/// A chemical element from the periodic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
}

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", //
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", //
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", //
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", //
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", //
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", //
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", //
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", //
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", //
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", //
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Look up an element by its symbol (e.g. "C", "Fe"). Case-sensitive.
pub fn element_by_symbol(symbol: &str) -> Option<Element> {
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| Element { atomic_number: (i + 1) as u8, symbol: SYMBOLS[i] })
}

/// Look up an element by its atomic number (1-based).
pub fn element_by_number(n: u8) -> Option<Element> {
    if n >= 1 && (n as usize) <= SYMBOLS.len() {
        Some(Element { atomic_number: n, symbol: SYMBOLS[(n - 1) as usize] })
    } else {
        None
    }
}

/// Default valences of the common main-group elements, smallest first.
///
/// Empty for elements whose valence is not checked.
pub fn default_valences(atomic_number: u8) -> &'static [usize] {
    match atomic_number {
        1 => &[1],
        5 => &[3],
        6 | 14 => &[4],
        7 => &[3],
        8 => &[2],
        9 => &[1],
        15 | 33 => &[3, 5],
        16 | 34 | 52 => &[2, 4, 6],
        17 | 35 | 53 => &[1],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_carbon_by_symbol() {
        let c = element_by_symbol("C").unwrap();
        assert_eq!(c.atomic_number, 6);
        assert_eq!(c.symbol, "C");
    }

    #[test]
    fn lookup_by_number() {
        assert_eq!(element_by_number(7).unwrap().symbol, "N");
        assert_eq!(element_by_number(78).unwrap().symbol, "Pt");
        assert_eq!(element_by_number(118).unwrap().symbol, "Og");
    }

    #[test]
    fn table_is_consistent() {
        for n in 1..=118u8 {
            let e = element_by_number(n).unwrap();
            assert_eq!(element_by_symbol(e.symbol).unwrap().atomic_number, n);
        }
    }

    #[test]
    fn unknown_returns_none() {
        assert!(element_by_symbol("Zz").is_none());
        assert!(element_by_symbol("c").is_none());
        assert!(element_by_number(0).is_none());
        assert!(element_by_number(119).is_none());
    }
}
