//! Residue alphabets.
//!
//! An alphabet is a set of canonical letters plus alternative spellings that
//! are accepted as synonyms (lower case, `?` or `~` for unknown or gap, ...).
//! Readers use [`Alphabet::alphabetic`] to reject residue data that does not
//! belong to the requested character set.
//!
//! Membership is decided through 256-entry lookup tables computed at compile
//! time, so validating a line costs one table access per byte.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// A named residue character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alphabet {
    /// Any printable ASCII character.
    #[default]
    Generic,
    /// IUPAC protein codes, including the ambiguity codes B, J, Z and X.
    Protein,
    /// DNA or RNA with IUPAC ambiguity codes.
    Nucleic,
    /// DNA with IUPAC ambiguity codes. `U` is read as a synonym of `T`.
    Dna,
    /// RNA with IUPAC ambiguity codes. `T` is read as a synonym of `U`.
    Rna,
    /// `ACGT`, with every ambiguity code folded onto `N`.
    ReducedNucleic,
    /// The twenty standard amino acids plus `X`.
    ReducedProtein,
    UnambiguousDna,
    UnambiguousRna,
    UnambiguousProtein,
}

/// Error returned when parsing an unknown alphabet name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown alphabet '{0}'")]
pub struct UnknownAlphabet(pub String);

/// Builds a membership table from canonical letters and alternative
/// spellings. An alternative is accepted only when the letter it stands for
/// is itself part of the alphabet.
const fn membership(letters: &[u8], alternatives: &[u8], canonical: &[u8]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < letters.len() {
        table[letters[i] as usize] = true;
        i += 1;
    }
    let mut i = 0;
    while i < alternatives.len() && i < canonical.len() {
        if table[canonical[i] as usize] {
            table[alternatives[i] as usize] = true;
        }
        i += 1;
    }
    table
}

const GENERIC: [bool; 256] = {
    let mut table = [false; 256];
    let mut c = 32;
    while c < 128 {
        table[c] = true;
        c += 1;
    }
    table
};

const PROTEIN: [bool; 256] = membership(
    b"ACDEFGHIKLMNOPQRSTUVWYBJZX*-",
    b"acdefghiklmnopqrstuvwybjzx?.~",
    b"ACDEFGHIKLMNOPQRSTUVWYBJZXX--",
);

const NUCLEIC: [bool; 256] = membership(
    b"ACGTURYSWKMBDHVN-",
    b"acgturyswkmbdhvnXx?.~",
    b"ACGTURYSWKMBDHVNNNN--",
);

const DNA: [bool; 256] = membership(
    b"ACGTRYSWKMBDHVN-",
    b"acgtryswkmbdhvnXx?.~Uu",
    b"ACGTRYSWKMBDHVNNNN--TT",
);

const RNA: [bool; 256] = membership(
    b"ACGURYSWKMBDHVN-",
    b"acguryswkmbdhvnXx?.~Tt",
    b"ACGURYSWKMBDHVNNNN--UU",
);

const REDUCED_NUCLEIC: [bool; 256] = membership(
    b"ACGTN-",
    b"acgtryswkmbdhvnXx?.~TtRYSWKMBDHV",
    b"ACGTNNNNNNNNNNNNNN--TTNNNNNNNNNN",
);

const REDUCED_PROTEIN: [bool; 256] = membership(
    b"ACDEFGHIKLMNPQRSTVWYX*-",
    b"acdefghiklmnpqrstvwyx?.~BbZzUu",
    b"ACDEFGHIKLMNPQRSTVWYXX--XXXXCC",
);

const UNAMBIGUOUS_DNA: [bool; 256] = membership(b"ACGT", b"acgt", b"ACGT");

const UNAMBIGUOUS_RNA: [bool; 256] = membership(b"ACGU", b"acgu", b"ACGU");

const UNAMBIGUOUS_PROTEIN: [bool; 256] = membership(
    b"ACDEFGHIKLMNPQRSTVWY",
    b"acdefghiklmnopqrstuvwy",
    b"ACDEFGHIKLMNOPQRSTUVWY",
);

impl Alphabet {
    /// Every alphabet, in declaration order.
    pub const ALL: [Alphabet; 10] = [
        Alphabet::Generic,
        Alphabet::Protein,
        Alphabet::Nucleic,
        Alphabet::Dna,
        Alphabet::Rna,
        Alphabet::ReducedNucleic,
        Alphabet::ReducedProtein,
        Alphabet::UnambiguousDna,
        Alphabet::UnambiguousRna,
        Alphabet::UnambiguousProtein,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Generic => "generic",
            Alphabet::Protein => "protein",
            Alphabet::Nucleic => "nucleic",
            Alphabet::Dna => "dna",
            Alphabet::Rna => "rna",
            Alphabet::ReducedNucleic => "reduced-nucleic",
            Alphabet::ReducedProtein => "reduced-protein",
            Alphabet::UnambiguousDna => "unambiguous-dna",
            Alphabet::UnambiguousRna => "unambiguous-rna",
            Alphabet::UnambiguousProtein => "unambiguous-protein",
        }
    }

    fn table(self) -> &'static [bool; 256] {
        match self {
            Alphabet::Generic => &GENERIC,
            Alphabet::Protein => &PROTEIN,
            Alphabet::Nucleic => &NUCLEIC,
            Alphabet::Dna => &DNA,
            Alphabet::Rna => &RNA,
            Alphabet::ReducedNucleic => &REDUCED_NUCLEIC,
            Alphabet::ReducedProtein => &REDUCED_PROTEIN,
            Alphabet::UnambiguousDna => &UNAMBIGUOUS_DNA,
            Alphabet::UnambiguousRna => &UNAMBIGUOUS_RNA,
            Alphabet::UnambiguousProtein => &UNAMBIGUOUS_PROTEIN,
        }
    }

    /// True if every character of `text` belongs to this alphabet.
    ///
    /// The empty string is alphabetic. Non-ASCII characters never are.
    pub fn alphabetic(self, text: &str) -> bool {
        let table = self.table();
        text.bytes().all(|b| table[b as usize])
    }

    /// Returns the first character of `text` outside this alphabet.
    pub fn first_invalid(self, text: &str) -> Option<char> {
        let table = self.table();
        text.chars()
            .find(|&c| !c.is_ascii() || !table[c as usize])
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Alphabet {
    type Err = UnknownAlphabet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Alphabet::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAlphabet(s.to_string()))
    }
}
