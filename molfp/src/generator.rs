//! The four fingerprint encoders and the row loop they share.
//!
//! Every encoder runs the same skeleton: parse each SMILES, add explicit
//! hydrogens, compute a descriptor of fixed width, collect a row per input in
//! input order (all-null for inputs that fail to parse), report the failures
//! once, and drop the incomplete rows.

use log::{debug, error, info};
use molfp_core::{MolfpError, Result};

use crate::config::{EncoderKind, FingerprintConfig};
use crate::engine::{ChemEngine, GraphEngine};
use crate::report::{Diagnostics, LogDiagnostics};
use crate::table::FingerprintTable;

/// Width of a MACCS key vector: 166 keys at positions 1..=166, position 0 unused.
pub const MACCS_WIDTH: usize = 167;

/// Parameters of the ECFP and ECFC encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcfpParams {
    pub radius: usize,
    pub width: usize,
    pub use_counts: bool,
}

impl Default for EcfpParams {
    fn default() -> Self {
        EcfpParams { radius: 2, width: 2048, use_counts: false }
    }
}

impl EcfpParams {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(MolfpError::InvalidInput("ECFP width must be positive".into()));
        }
        Ok(())
    }
}

/// Parameters of the ECFC encoder: [`EcfpParams`] with counting on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcfcParams {
    pub radius: usize,
    pub width: usize,
    pub use_counts: bool,
}

impl Default for EcfcParams {
    fn default() -> Self {
        EcfcParams { radius: 2, width: 2048, use_counts: true }
    }
}

impl From<EcfcParams> for EcfpParams {
    fn from(params: EcfcParams) -> Self {
        EcfpParams { radius: params.radius, width: params.width, use_counts: params.use_counts }
    }
}

/// Parameters of the SECFP (MinHash) encoder.
///
/// `width` is the number of MinHash permutations and therefore the output
/// width; `length` is the folding length of the SECFP bit set that is hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecfpParams {
    pub radius: usize,
    pub width: usize,
    pub length: usize,
}

impl Default for SecfpParams {
    fn default() -> Self {
        SecfpParams { radius: 3, width: 2048, length: 2048 }
    }
}

impl SecfpParams {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(MolfpError::InvalidInput("SECFP width must be positive".into()));
        }
        if self.length == 0 {
            return Err(MolfpError::InvalidInput("SECFP length must be positive".into()));
        }
        Ok(())
    }
}

/// Converts SMILES sequences into fingerprint tables.
///
/// # Example
///
/// ```
/// use molfp::{EcfpParams, FingerprintGenerator};
///
/// let generator = FingerprintGenerator::new();
/// let table = generator.encode_ecfp(["CCO", "XXXX", "c1ccccc1"], EcfpParams::default());
/// assert_eq!(table.keys().collect::<Vec<_>>(), vec!["CCO", "c1ccccc1"]);
/// assert_eq!(table.width(), 2048);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FingerprintGenerator<E = GraphEngine, D = LogDiagnostics> {
    engine: E,
    diagnostics: D,
}

impl FingerprintGenerator {
    /// Generator on the bundled graph engine, reporting through `log`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ChemEngine, D: Diagnostics> FingerprintGenerator<E, D> {
    pub fn with_parts(engine: E, diagnostics: D) -> Self {
        FingerprintGenerator { engine, diagnostics }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Morgan fingerprints as bit vectors, or count vectors if `use_counts`.
    pub fn encode_ecfp<I>(&self, smiles: I, params: EcfpParams) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let label = if params.use_counts { "ECFC" } else { "ECFP" };
        self.encode_with(label, smiles, params.width, |engine, mol| {
            engine.circular_fingerprint(mol, params.radius, params.width, params.use_counts)
        })
    }

    /// Morgan count vectors; [`EcfcParams::default`] counts unless told not to.
    pub fn encode_ecfc<I>(&self, smiles: I, params: EcfcParams) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.encode_ecfp(smiles, params.into())
    }

    /// MACCS keys, always [`MACCS_WIDTH`] positions wide.
    pub fn encode_maccs<I>(&self, smiles: I) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.encode_with("MACCS", smiles, MACCS_WIDTH, |engine, mol| engine.maccs_keys(mol))
    }

    /// MinHash fingerprints with `params.width` values per row.
    ///
    /// One encoder is built per call and shared by every row.
    pub fn encode_secfp<I>(&self, smiles: I, params: SecfpParams) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let encoder = self.engine.minhash_encoder(params.width);
        self.encode_with("SECFP", smiles, params.width, |engine, mol| {
            engine.minhash_fingerprint(&encoder, mol, params.radius, params.length)
        })
    }

    /// Run the encoder selected by `config`.
    pub fn encode<I>(&self, smiles: I, config: &FingerprintConfig) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        match config.encoder {
            EncoderKind::Ecfp => self.encode_ecfp(smiles, config.ecfp_params()),
            EncoderKind::Ecfc => self.encode_ecfc(smiles, config.ecfc_params()),
            EncoderKind::Maccs => self.encode_maccs(smiles),
            EncoderKind::Secfp => self.encode_secfp(smiles, config.secfp_params()),
        }
    }

    /// The shared skeleton: one row per input, `width` cells per row.
    ///
    /// `descriptor` receives the hydrogen-complete molecule and must return
    /// exactly `width` values; a row where it does not is logged and dropped.
    pub fn encode_with<I, F>(
        &self,
        label: &str,
        smiles: I,
        width: usize,
        descriptor: F,
    ) -> FingerprintTable
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: Fn(&E, &E::Molecule) -> Vec<u32> + Sync,
    {
        let inputs: Vec<String> = smiles.into_iter().map(|s| s.as_ref().to_owned()).collect();
        let outcomes = self.compute_rows(&inputs, &descriptor);

        let mut table = FingerprintTable::new(width);
        let mut erroneous = Vec::new();
        for (smiles, outcome) in inputs.into_iter().zip(outcomes) {
            let cells = match outcome {
                Some(values) if values.len() == width => values.into_iter().map(Some).collect(),
                Some(values) => {
                    error!(
                        "{label}: descriptor for {smiles:?} has {} values, expected {width}",
                        values.len()
                    );
                    vec![None; width]
                }
                None => {
                    erroneous.push(smiles.clone());
                    vec![None; width]
                }
            };
            if let Err(e) = table.push(smiles, cells) {
                error!("{label}: {e}");
            }
        }

        if !erroneous.is_empty() {
            self.diagnostics.report_erroneous(&erroneous);
        }
        let dropped = table.drop_incomplete();
        info!("{label}: {} rows of width {width}, {dropped} dropped", table.len());
        table
    }

    fn compute_rows<F>(&self, inputs: &[String], descriptor: &F) -> Vec<Option<Vec<u32>>>
    where
        F: Fn(&E, &E::Molecule) -> Vec<u32> + Sync,
    {
        let engine = &self.engine;
        let encode_one = |smiles: &String| match engine.parse(smiles) {
            Ok(mol) => {
                let mol = engine.add_explicit_hydrogens(mol);
                Some(descriptor(engine, &mol))
            }
            Err(e) => {
                debug!("failed to parse {smiles:?}: {e}");
                None
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            inputs.par_iter().map(encode_one).collect()
        }

        #[cfg(not(feature = "parallel"))]
        inputs.iter().map(encode_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Molecules are the input text; anything containing 'X' fails to parse.
    #[derive(Default)]
    struct FakeEngine {
        encoders_built: AtomicUsize,
    }

    #[derive(Debug)]
    struct FakeMol {
        text: String,
        hydrogenated: bool,
    }

    impl ChemEngine for FakeEngine {
        type Molecule = FakeMol;
        type MinHasher = usize;

        fn parse(&self, smiles: &str) -> Result<FakeMol> {
            if smiles.contains('X') {
                return Err(MolfpError::Parse(format!("bad atom in {smiles}")));
            }
            Ok(FakeMol { text: smiles.to_string(), hydrogenated: false })
        }

        fn add_explicit_hydrogens(&self, mol: FakeMol) -> FakeMol {
            FakeMol { hydrogenated: true, ..mol }
        }

        fn circular_fingerprint(
            &self,
            mol: &FakeMol,
            _radius: usize,
            width: usize,
            as_counts: bool,
        ) -> Vec<u32> {
            assert!(mol.hydrogenated);
            let n = mol.text.len() as u32;
            (0..width as u32).map(|i| if as_counts { n + i } else { (n + i) % 2 }).collect()
        }

        fn maccs_keys(&self, mol: &FakeMol) -> Vec<u32> {
            assert!(mol.hydrogenated);
            let mut keys = vec![1; MACCS_WIDTH];
            keys[0] = 0;
            keys
        }

        fn minhash_encoder(&self, n_permutations: usize) -> usize {
            self.encoders_built.fetch_add(1, Ordering::SeqCst);
            n_permutations
        }

        fn minhash_fingerprint(
            &self,
            encoder: &usize,
            mol: &FakeMol,
            radius: usize,
            _length: usize,
        ) -> Vec<u32> {
            assert!(mol.hydrogenated);
            vec![radius as u32; *encoder]
        }
    }

    #[derive(Default)]
    struct Recorder {
        reports: RefCell<Vec<Vec<String>>>,
    }

    impl Diagnostics for Recorder {
        fn report_erroneous(&self, smiles: &[String]) {
            self.reports.borrow_mut().push(smiles.to_vec());
        }
    }

    fn generator() -> FingerprintGenerator<FakeEngine, Recorder> {
        FingerprintGenerator::with_parts(FakeEngine::default(), Recorder::default())
    }

    const INPUT: [&str; 5] = ["CCCC", "CO", "XXXX", "c1ccccc1", "CXC"];

    #[test]
    fn failures_are_reported_once_and_dropped() {
        let gen = generator();
        let table = gen.encode_ecfp(INPUT, EcfpParams::default());
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["CCCC", "CO", "c1ccccc1"]);
        assert!(table.iter().all(|r| r.is_complete() && r.cells.len() == 2048));
        let reports = gen.diagnostics().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], vec!["XXXX".to_string(), "CXC".to_string()]);
    }

    #[test]
    fn no_report_without_failures() {
        let gen = generator();
        let table = gen.encode_maccs(["CCO", "CO"]);
        assert_eq!(table.len(), 2);
        assert!(gen.diagnostics().reports.borrow().is_empty());
    }

    #[test]
    fn order_and_duplicates_preserved() {
        let gen = generator();
        let input: Vec<String> = (0..200).map(|i| "C".repeat(i % 7 + 1)).collect();
        let table = gen.encode_ecfp(&input, EcfpParams { width: 8, ..Default::default() });
        assert_eq!(table.len(), 200);
        for (row, smiles) in table.iter().zip(&input) {
            assert_eq!(&row.smiles, smiles);
        }
        assert_eq!(table.get_all("C").count(), input.iter().filter(|s| *s == "C").count());
    }

    #[test]
    fn bit_and_count_modes() {
        let gen = generator();
        let bits = gen.encode_ecfp(["CCCC"], EcfpParams { width: 16, ..Default::default() });
        let counts = gen.encode_ecfc(["CCCC"], EcfcParams { width: 16, ..Default::default() });
        let bit_values = bits.rows()[0].values().unwrap();
        let count_values = counts.rows()[0].values().unwrap();
        assert!(bit_values.iter().all(|&v| v <= 1));
        assert_ne!(bit_values, count_values);
        assert_eq!(
            counts,
            gen.encode_ecfp(["CCCC"], EcfpParams { width: 16, use_counts: true, radius: 2 })
        );
    }

    #[test]
    fn ecfc_counts_by_default() {
        let gen = generator();
        let ecfc = gen.encode_ecfc(INPUT, EcfcParams::default());
        let counted = gen.encode_ecfp(INPUT, EcfpParams { use_counts: true, ..Default::default() });
        assert_eq!(ecfc, counted);
        assert!(ecfc.rows()[0].values().unwrap().iter().any(|&v| v > 1));

        let narrow = EcfcParams { width: 16, radius: 1, ..Default::default() };
        assert_eq!(
            gen.encode_ecfc(["CCCC"], narrow),
            gen.encode_ecfp(["CCCC"], EcfpParams { width: 16, radius: 1, use_counts: true })
        );
        let bits = gen.encode_ecfc(["CCCC"], EcfcParams { use_counts: false, ..Default::default() });
        assert_eq!(bits, gen.encode_ecfp(["CCCC"], EcfpParams::default()));
    }

    #[test]
    fn widths_follow_parameters() {
        let gen = generator();
        for width in [1, 64, 1024] {
            let table = gen.encode_ecfp(["CCO"], EcfpParams { width, ..Default::default() });
            assert_eq!(table.width(), width);
            assert_eq!(table.rows()[0].cells.len(), width);
        }
        assert_eq!(gen.encode_maccs(["CCO"]).width(), MACCS_WIDTH);
    }

    #[test]
    fn secfp_builds_one_encoder_per_call() {
        let gen = generator();
        let params = SecfpParams { width: 32, ..Default::default() };
        let table = gen.encode_secfp(INPUT, params);
        assert_eq!(gen.engine().encoders_built.load(Ordering::SeqCst), 1);
        assert_eq!(table.width(), 32);
        assert_eq!(table.rows()[0].values().unwrap(), vec![3; 32]);
    }

    #[test]
    fn wrong_width_descriptor_rows_are_dropped_silently() {
        let gen = generator();
        let table = gen.encode_with("test", ["CC", "CCC"], 3, |_, mol| vec![0; mol.text.len()]);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["CCC"]);
        assert!(gen.diagnostics().reports.borrow().is_empty());
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let gen = generator();
        let table = gen.encode_maccs(Vec::<String>::new());
        assert!(table.is_empty());
        assert_eq!(table.width(), MACCS_WIDTH);
    }

    #[test]
    fn config_dispatch() {
        let gen = generator();
        let config = FingerprintConfig { encoder: EncoderKind::Secfp, width: 10, ..Default::default() };
        assert_eq!(gen.encode(["CCO"], &config).width(), 10);
        let config = FingerprintConfig { encoder: EncoderKind::Maccs, ..Default::default() };
        assert_eq!(gen.encode(["CCO"], &config).width(), MACCS_WIDTH);
    }

    #[test]
    fn params_validation() {
        assert!(EcfpParams::default().validate().is_ok());
        assert!(EcfpParams { width: 0, ..Default::default() }.validate().is_err());
        assert!(SecfpParams { length: 0, ..Default::default() }.validate().is_err());
        assert!(SecfpParams { width: 0, ..Default::default() }.validate().is_err());
        assert_eq!(SecfpParams::default().radius, 3);
        assert!(EcfcParams::default().use_counts);
        assert!(!EcfpParams::default().use_counts);
        assert!(EcfpParams::from(EcfcParams { width: 0, ..Default::default() }).validate().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mixed_input() -> impl Strategy<Value = Vec<String>> {
        let smiles = prop_oneof![
            Just("CCCC"),
            Just("CO"),
            Just("c1ccccc1"),
            Just("CC(=O)O"),
            Just("XXXX"),
            Just("C1CC"),
            Just("C(("),
        ];
        proptest::collection::vec(smiles.prop_map(str::to_owned), 0..=12)
    }

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(input in proptest::collection::vec("\\PC{0,20}", 0..=5)) {
            let table = FingerprintGenerator::new().encode_maccs(&input);
            prop_assert!(table.len() <= input.len());
            prop_assert!(table.iter().all(|row| row.is_complete()));
        }

        #[test]
        fn valid_rows_keep_input_order(input in mixed_input()) {
            let params = EcfpParams { width: 64, ..Default::default() };
            let table = FingerprintGenerator::new().encode_ecfp(&input, params);
            let expected: Vec<&str> = input
                .iter()
                .map(String::as_str)
                .filter(|s| molfp_chem::parse_smiles(s).is_ok())
                .collect();
            prop_assert_eq!(table.keys().collect::<Vec<_>>(), expected);
            prop_assert!(table.iter().all(|row| row.cells.len() == 64 && row.is_complete()));
        }
    }
}
