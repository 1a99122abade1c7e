//! GenBank flat file records.
//!
//! Only the identity and the residues of each record are kept: the name from
//! the `LOCUS` line, the description from `DEFINITION`, and the sequence
//! from the `ORIGIN` section. Features and references are skipped.

use std::io::BufRead;

use super::lines::Lines;
use super::{check_alphabet, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "LOCUS       AB000263                 368 bp    mRNA    linear   PRI 05-FEB-1999
DEFINITION  Homo sapiens mRNA for prepro cortistatin like peptide, complete
            cds.
ACCESSION   AB000263
VERSION     AB000263.1
KEYWORDS    .
SOURCE      Homo sapiens (human)
  ORGANISM  Homo sapiens
            Eukaryota; Metazoa; Chordata; Craniata; Vertebrata; Euteleostomi;
            Mammalia; Eutheria; Euarchontoglires; Primates; Haplorrhini;
            Catarrhini; Hominidae; Homo.
FEATURES             Location/Qualifiers
     source          1..368
                     /organism=\"Homo sapiens\"
                     /mol_type=\"mRNA\"
     CDS             1..368
                     /codon_start=1
                     /product=\"prepro cortistatin like peptide\"
ORIGIN
        1 acaagatgcc attgtccccc ggcctcctgc tgctgctgct ctccggggcc acggccaccg
       61 ctgccctgcc cctggagggt ggccccaccg gccgagacag cgagcatatg caggaagcgg
      121 caggaataag gaaaagcagc ctcctgactt tcctcgcttg gtggtttgag tggacctccc
      181 aggccagtgc cgggcccctc ataggagagg aagctcggga ggtggccagg cggcaggaag
      241 gcgcaccccc ccagcaatcc gcgcgccggg acagaatgcc ctgcaggaac ttcttctgga
      301 agaccttctc ctcctgcaaa taaaacctca cccatgaatg ctcacgcaag tttaattaca
      361 gacctgaa
//
";

/// Indentation of continuation lines.
const CONTINUATION: &str = "            ";

enum State {
    /// Between records, expecting `LOCUS`.
    Between,
    /// Inside a record, before `ORIGIN`.
    Header { in_definition: bool },
    /// Inside the `ORIGIN` section.
    Origin,
}

/// Reads GenBank records. Empty input yields an empty collection.
///
/// A record closed by `//` without an `ORIGIN` section has no residues.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut seqs = Vec::new();
    let mut state = State::Between;
    let mut name = String::new();
    let mut description = String::new();
    let mut data = String::new();
    let mut lines = Lines::new(reader);

    for line in &mut lines {
        let (number, line) = line?;
        state = match state {
            State::Between => {
                if line.trim().is_empty() {
                    State::Between
                } else if line.starts_with("LOCUS") {
                    name = line.split_whitespace().nth(1).unwrap_or("").to_string();
                    description.clear();
                    data.clear();
                    State::Header {
                        in_definition: false,
                    }
                } else {
                    return Err(ParseError::syntax(number, "cannot find start of GenBank record (LOCUS)"));
                }
            }
            State::Header { in_definition } => {
                if line.starts_with("//") || line.starts_with("ORIGIN") {
                    if line.starts_with("//") {
                        seqs.push(build(&name, &description, &data, alphabet));
                        State::Between
                    } else {
                        State::Origin
                    }
                } else if let Some(text) = line.strip_prefix("DEFINITION") {
                    description = text.trim().to_string();
                    State::Header {
                        in_definition: true,
                    }
                } else if in_definition && line.starts_with(CONTINUATION) {
                    description.push(' ');
                    description.push_str(line.trim());
                    State::Header {
                        in_definition: true,
                    }
                } else {
                    State::Header {
                        in_definition: false,
                    }
                }
            }
            State::Origin => {
                if line.starts_with("//") {
                    seqs.push(build(&name, &description, &data, alphabet));
                    State::Between
                } else {
                    // drop the leading position column
                    let chunk: String = line.split_whitespace().skip(1).collect();
                    check_alphabet(alphabet, number, &chunk)?;
                    data.push_str(&chunk);
                    State::Origin
                }
            }
        };
    }

    match state {
        State::Between => Ok(SeqList::new(seqs)),
        _ => Err(ParseError::syntax(
            lines.line_number(),
            "GenBank record not terminated by '//'",
        )),
    }
}

fn build(name: &str, description: &str, data: &str, alphabet: Alphabet) -> Sequence {
    let seq = Sequence::new(name, data)
        .with_description(description)
        .with_alphabet(alphabet);
    if name.is_empty() {
        Sequence { name: None, ..seq }
    } else {
        seq
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_str(text: &str) -> ParseResult<SeqList> {
        read(Cursor::new(text), None)
    }

    #[test]
    fn test_read_example() {
        let seqs = read_str(EXAMPLE).unwrap();
        assert_eq!(seqs.sequence_count(), 1);
        let seq = &seqs[0];
        assert_eq!(seq.name.as_deref(), Some("AB000263"));
        assert_eq!(
            seq.description.as_deref(),
            Some("Homo sapiens mRNA for prepro cortistatin like peptide, complete cds.")
        );
        assert_eq!(seq.len(), 368);
        assert!(seq.data.starts_with("acaagatgccattgtcc"));
        assert!(seq.data.ends_with("gacctgaa"));
    }

    #[test]
    fn test_multiple_records_and_blank_lines() {
        let text = "\nLOCUS       A  4 bp\nORIGIN\n        1 acgt\n//\n\n\nLOCUS       B  2 bp\nORIGIN\n        1 tt\n//\n";
        let seqs = read_str(text).unwrap();
        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[0].data, "acgt");
        assert_eq!(seqs[1].name.as_deref(), Some("B"));
        assert_eq!(seqs[1].data, "tt");
    }

    #[test]
    fn test_record_without_origin() {
        let seqs = read_str("LOCUS       CONTIG1\nCONTIG      join(A:1..4)\n//\n").unwrap();
        assert_eq!(seqs.sequence_count(), 1);
        assert!(seqs[0].is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(read_str("ID   X\nLOCUS  A\n").unwrap_err().line(), Some(1));
        assert!(read_str("LOCUS       A\nORIGIN\n        1 acgt\n").is_err());
        assert!(read_str("LOCUS       A\n").is_err());
    }

    #[test]
    fn test_alphabet_override() {
        let text = "LOCUS       A\nORIGIN\n        1 acgt\n       5 xyz\n//\n";
        let err = read(Cursor::new(text), Some(Alphabet::UnambiguousDna)).unwrap_err();
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_empty_input() {
        assert!(read_str("").unwrap().is_empty());
    }
}
