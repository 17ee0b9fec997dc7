use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    T,
    G,
    C,
    U,
}

impl Base {
    pub const DNA: [Base; 4] = [Base::A, Base::T, Base::G, Base::C];
    pub const RNA: [Base; 4] = [Base::A, Base::U, Base::G, Base::C];

    pub fn symbol(self) -> char {
        match self {
            Base::A => 'A',
            Base::T => 'T',
            Base::G => 'G',
            Base::C => 'C',
            Base::U => 'U',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Base> {
        match symbol.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'T' => Some(Base::T),
            'G' => Some(Base::G),
            'C' => Some(Base::C),
            'U' => Some(Base::U),
            _ => None,
        }
    }

    /// DNA template base to the RNA base paired against it.
    pub fn transcribe(self) -> Base {
        match self {
            Base::A => Base::U,
            Base::T | Base::U => Base::A,
            Base::G => Base::C,
            Base::C => Base::G,
        }
    }

    /// RNA base to the RNA base that pairs with it.
    pub fn rna_complement(self) -> Base {
        match self {
            Base::A => Base::U,
            Base::T | Base::U => Base::A,
            Base::G => Base::C,
            Base::C => Base::G,
        }
    }
}

/// Alphabet the codon table is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RnaBase {
    A,
    U,
    G,
    C,
}

impl From<Base> for RnaBase {
    fn from(base: Base) -> Self {
        match base {
            Base::A => RnaBase::A,
            Base::T | Base::U => RnaBase::U,
            Base::G => RnaBase::G,
            Base::C => RnaBase::C,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    pub const fn new(bases: [Base; 3]) -> Self {
        Self(bases)
    }

    pub fn bases(&self) -> [Base; 3] {
        self.0
    }

    pub fn transcribe(self) -> Codon {
        Codon(self.0.map(Base::transcribe))
    }

    pub fn anticodon(self) -> Codon {
        Codon(self.0.map(Base::rna_complement))
    }

    /// Reads the codon as mRNA. A `T` is read as `U`.
    pub fn translate(self) -> AminoAcid {
        let [first, second, third] = self.0.map(RnaBase::from);
        amino_acid_for(first, second, third)
    }

    pub fn random_dna(rng: &mut impl Rng) -> Codon {
        Codon([0; 3].map(|_| Base::DNA[rng.gen_range(0..Base::DNA.len())]))
    }

    pub fn random_rna(rng: &mut impl Rng) -> Codon {
        Codon([0; 3].map(|_| Base::RNA[rng.gen_range(0..Base::RNA.len())]))
    }
}

/// DNA codon whose transcript does not end translation early.
pub fn random_coding_dna_codon(rng: &mut impl Rng) -> Codon {
    loop {
        let codon = Codon::random_dna(rng);
        if codon.transcribe().translate() != AminoAcid::Stop {
            return codon;
        }
    }
}

pub fn transcribe(codon: Codon) -> Codon {
    codon.transcribe()
}

pub fn translate(codon: Codon) -> AminoAcid {
    codon.translate()
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.0 {
            write!(f, "{}", base.symbol())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodonParseError {
    #[error("codon must have exactly 3 bases, got {0}")]
    WrongLength(usize),
    #[error("invalid base {0:?}")]
    InvalidBase(char),
}

impl FromStr for Codon {
    type Err = CodonParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = raw.trim().chars().collect();
        let [a, b, c] = symbols[..] else {
            return Err(CodonParseError::WrongLength(symbols.len()));
        };
        let parse = |symbol| Base::from_symbol(symbol).ok_or(CodonParseError::InvalidBase(symbol));
        Ok(Codon([parse(a)?, parse(b)?, parse(c)?]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

impl AminoAcid {
    pub fn label(self) -> &'static str {
        match self {
            AminoAcid::Ala => "ALA",
            AminoAcid::Arg => "ARG",
            AminoAcid::Asn => "ASN",
            AminoAcid::Asp => "ASP",
            AminoAcid::Cys => "CYS",
            AminoAcid::Gln => "GLN",
            AminoAcid::Glu => "GLU",
            AminoAcid::Gly => "GLY",
            AminoAcid::His => "HIS",
            AminoAcid::Ile => "ILE",
            AminoAcid::Leu => "LEU",
            AminoAcid::Lys => "LYS",
            AminoAcid::Met => "MET",
            AminoAcid::Phe => "PHE",
            AminoAcid::Pro => "PRO",
            AminoAcid::Ser => "SER",
            AminoAcid::Thr => "THR",
            AminoAcid::Trp => "TRP",
            AminoAcid::Tyr => "TYR",
            AminoAcid::Val => "VAL",
            AminoAcid::Stop => "STOP",
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signal molecule picked at session start. It selects the receptor that binds it
/// and the stop codon that ends the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedSignal {
    First,
    Second,
    Third,
    Fourth,
}

impl SeedSignal {
    pub const ALL: [SeedSignal; 4] = [
        SeedSignal::First,
        SeedSignal::Second,
        SeedSignal::Third,
        SeedSignal::Fourth,
    ];
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        let index = value.checked_sub(Self::MIN)?;
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn value(self) -> u8 {
        match self {
            SeedSignal::First => 1,
            SeedSignal::Second => 2,
            SeedSignal::Third => 3,
            SeedSignal::Fourth => 4,
        }
    }

    pub fn stop_codon(self) -> Codon {
        let last = match self {
            SeedSignal::First => [Base::A, Base::C, Base::T],
            SeedSignal::Third => [Base::A, Base::T, Base::C],
            SeedSignal::Second | SeedSignal::Fourth => [Base::A, Base::T, Base::T],
        };
        Codon(last)
    }
}

fn amino_acid_for(first: RnaBase, second: RnaBase, third: RnaBase) -> AminoAcid {
    use RnaBase::{A, C, G, U};

    let pyrimidine = matches!(third, U | C);
    match (first, second) {
        (U, U) if pyrimidine => AminoAcid::Phe,
        (U, U) => AminoAcid::Leu,
        (U, C) => AminoAcid::Ser,
        (U, A) if pyrimidine => AminoAcid::Tyr,
        (U, A) => AminoAcid::Stop,
        (U, G) if pyrimidine => AminoAcid::Cys,
        (U, G) if third == A => AminoAcid::Stop,
        (U, G) => AminoAcid::Trp,
        (C, U) => AminoAcid::Leu,
        (C, C) => AminoAcid::Pro,
        (C, A) if pyrimidine => AminoAcid::His,
        (C, A) => AminoAcid::Gln,
        (C, G) => AminoAcid::Arg,
        (A, U) if third == G => AminoAcid::Met,
        (A, U) => AminoAcid::Ile,
        (A, C) => AminoAcid::Thr,
        (A, A) if pyrimidine => AminoAcid::Asn,
        (A, A) => AminoAcid::Lys,
        (A, G) if pyrimidine => AminoAcid::Ser,
        (A, G) => AminoAcid::Arg,
        (G, U) => AminoAcid::Val,
        (G, C) => AminoAcid::Ala,
        (G, A) if pyrimidine => AminoAcid::Asp,
        (G, A) => AminoAcid::Glu,
        (G, G) => AminoAcid::Gly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn codon(raw: &str) -> Codon {
        raw.parse().expect("codon")
    }

    #[test]
    fn transcription_table_is_one_directional() {
        assert_eq!(transcribe(codon("TAC")), codon("AUG"));
        assert_eq!(transcribe(codon("GCA")), codon("CGU"));
        assert_eq!(Base::A.transcribe(), Base::U);
        assert_eq!(Base::T.transcribe(), Base::A);
        assert_eq!(Base::G.transcribe(), Base::C);
        assert_eq!(Base::C.transcribe(), Base::G);
    }

    #[test]
    fn transcription_is_pure() {
        for first in Base::DNA {
            for second in Base::DNA {
                for third in Base::DNA {
                    let dna = Codon::new([first, second, third]);
                    assert_eq!(transcribe(dna), transcribe(dna));
                    assert!(transcribe(dna).bases().iter().all(|base| *base != Base::T));
                }
            }
        }
    }

    #[test]
    fn start_and_stop_codons_translate() {
        assert_eq!(translate(codon("AUG")), AminoAcid::Met);
        assert_eq!(translate(codon("UAA")), AminoAcid::Stop);
        assert_eq!(translate(codon("UAG")), AminoAcid::Stop);
        assert_eq!(translate(codon("UGA")), AminoAcid::Stop);
        assert_eq!(translate(codon("UGG")), AminoAcid::Trp);
        assert_eq!(translate(codon("GGC")), AminoAcid::Gly);
    }

    #[test]
    fn genetic_code_has_three_stops_and_one_start() {
        let mut stops = 0;
        let mut methionines = 0;
        for first in Base::RNA {
            for second in Base::RNA {
                for third in Base::RNA {
                    match translate(Codon::new([first, second, third])) {
                        AminoAcid::Stop => stops += 1,
                        AminoAcid::Met => methionines += 1,
                        _ => {}
                    }
                }
            }
        }
        assert_eq!(stops, 3);
        assert_eq!(methionines, 1);
    }

    #[test]
    fn template_end_codons_are_stops_after_transcription() {
        for raw in ["ACT", "ATT", "ATC"] {
            assert_eq!(translate(transcribe(codon(raw))), AminoAcid::Stop, "{raw}");
        }
    }

    #[test]
    fn anticodon_pairs_with_mrna() {
        assert_eq!(codon("AUG").anticodon(), codon("UAC"));
        assert_eq!(codon("GCU").anticodon(), codon("CGA"));
        assert_eq!(codon("ATG").anticodon(), codon("UAC"));
    }

    #[test]
    fn thymine_reads_as_uracil_in_the_codon_table() {
        for first in Base::DNA {
            for second in Base::DNA {
                for third in Base::DNA {
                    let dna = Codon::new([first, second, third]);
                    let rna = Codon::new(dna.bases().map(|base| match base {
                        Base::T => Base::U,
                        other => other,
                    }));
                    assert_eq!(translate(dna), translate(rna), "{dna}");
                }
            }
        }
        assert_eq!(translate(codon("ATG")), AminoAcid::Met);
        assert_eq!(translate(codon("TAA")), AminoAcid::Stop);
        assert_eq!(translate(codon("TTT")), AminoAcid::Phe);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("TA".parse::<Codon>(), Err(CodonParseError::WrongLength(2)));
        assert_eq!("TAX".parse::<Codon>(), Err(CodonParseError::InvalidBase('X')));
        assert_eq!(codon("tac").to_string(), "TAC");
    }

    #[test]
    fn seed_signal_is_bounded() {
        assert!(SeedSignal::new(0).is_none());
        assert!(SeedSignal::new(5).is_none());
        let seed = SeedSignal::new(3).expect("seed");
        assert_eq!(seed, SeedSignal::Third);
        assert_eq!(seed.stop_codon(), codon("ATC"));
        for signal in SeedSignal::ALL {
            assert_eq!(SeedSignal::new(signal.value()), Some(signal));
        }

        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let value = SeedSignal::random(&mut rng).value();
            assert!((1..=4).contains(&value));
        }
    }

    #[test]
    fn coding_codons_never_transcribe_to_stop() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let dna = random_coding_dna_codon(&mut rng);
            assert_ne!(translate(transcribe(dna)), AminoAcid::Stop);
            assert!(dna.bases().iter().all(|base| *base != Base::U));
        }
    }
}
