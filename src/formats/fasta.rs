//! FASTA file parser and writer.
//!
//! Handles both single-line and multi-line sequences.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! ;optional comment, appended to the description
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::io::{self, BufRead, Write};

use super::lines::Lines;
use super::{check_alphabet, strip_whitespace, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "
>Lamprey GLOBIN V - SEA LAMPREY
PIVDTGSVA-P------------------LSAAEKTKIRSAWAPVYSTY---ETSGVDILVKFFTSTPAAQEFFPKFKGL
TT-----ADQLKKSA---DVRWHA-ERIINAVNDAVASMDDTEKMS--MKL-RDLSGKH----AKSFQV-----DPQYFK
VLAAVI-AD-TVAAGD--AGFEKLMSM------I---CILLR----S-----A-----Y------------

>Hagfish GLOBIN III - ATLANTIC HAGFISH
PITDHGQPP-T------------------LSEGDKKAIRESWPQIYKNF---EQNSLAVLLEFLKKFPKAQDSFPKFSAK
KS-------HLEQDP---AVKLQA-EVIINAVNHTIGLMDKEAAMK--KYL-KDLSTKH----STEFQV-----NPDMFK
ELSAVF-VS-TMG-GK--AAYEKLFSI------I---ATLLR----S-----T-----YDA----------

>Frog HEMOGLOBIN BETA CHAIN - EDIBLE FROG
----------GS-----------------------DLVSGFWGKV--DA---HKIGGEALARLLVVYPWTQRYFTTFGNL
GSADAIC-----HNA---KVLAHG-EKVLAAIGEGLKHPENLKAHY--AKL-SEYHSNK----LHVDPANFRLLGNVFIT
VLARHF-QH-EFTPELQ-HALEAHFCA------V---GDALA----K-----A-----YH-----------
";

const LINE_WIDTH: usize = 80;

/// A record under construction.
struct Record {
    header: String,
    comments: Vec<String>,
    data: String,
}

impl Record {
    fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            comments: Vec::new(),
            data: String::new(),
        }
    }

    /// The name is the header up to the first space; the description is the
    /// whole header followed by any comment lines.
    fn finish(self, alphabet: Alphabet) -> Sequence {
        let name = self.header.split(' ').next().unwrap_or("").to_string();
        let mut description = self.header;
        for comment in &self.comments {
            description.push('\n');
            description.push_str(comment);
        }
        let mut seq = Sequence::unnamed(self.data)
            .with_description(description)
            .with_alphabet(alphabet);
        if !name.is_empty() {
            seq.name = Some(name);
        }
        seq
    }
}

/// Parses FASTA content from a reader.
///
/// Blank lines are skipped, and residue lines are checked against the
/// alphabet as they are read. Comment lines (`;`) before the first header
/// are ignored. Empty input yields an empty collection.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut sequences = Vec::new();
    let mut current: Option<Record> = None;

    for line in Lines::new(reader) {
        let (line_number, line) = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                sequences.push(record.finish(alphabet));
            }
            current = Some(Record::new(header));
        } else if let Some(comment) = line.strip_prefix(';') {
            if let Some(record) = current.as_mut() {
                record.comments.push(comment.to_string());
            }
        } else {
            let record = current.as_mut().ok_or_else(|| {
                ParseError::syntax(line_number, "sequence data before the first '>' header")
            })?;
            let data = strip_whitespace(line);
            check_alphabet(alphabet, line_number, &data)?;
            record.data.push_str(&data);
        }
    }

    if let Some(record) = current {
        sequences.push(record.finish(alphabet));
    }

    Ok(SeqList::new(sequences))
}

/// Header text for `seq`: the name, then the description unless the
/// description already starts with the name as its first word.
fn header(seq: &Sequence) -> String {
    match (seq.name.as_deref(), seq.description.as_deref()) {
        (Some(name), Some(description)) => {
            let first_word = description.lines().next().unwrap_or("").split(' ').next();
            if first_word == Some(name) {
                description.to_string()
            } else {
                format!("{} {}", name, description)
            }
        }
        (Some(name), None) => name.to_string(),
        (None, description) => description.unwrap_or("").to_string(),
    }
}

/// Writes `seqs` as FASTA, 80 residues per line.
///
/// Extra description lines become `;` comments.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    for seq in seqs {
        let header = header(seq);
        let mut header_lines = header.lines();
        writeln!(writer, ">{}", header_lines.next().unwrap_or(""))?;
        for comment in header_lines {
            writeln!(writer, ";{}", comment)?;
        }

        for start in (0..seq.len()).step_by(LINE_WIDTH) {
            writeln!(writer, "{}", seq.slice(start, start + LINE_WIDTH))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn parse_fasta_str(content: &str) -> ParseResult<SeqList> {
        read(Cursor::new(content), None)
    }

    #[test]
    fn test_parse_simple_fasta() {
        let content = ">seq1\nACGT\n>seq2\nTGCA\n";
        let seqs = parse_fasta_str(content).unwrap();

        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[0].name.as_deref(), Some("seq1"));
        assert_eq!(seqs[0].data, "ACGT");
        assert_eq!(seqs[1].name.as_deref(), Some("seq2"));
        assert_eq!(seqs[1].data, "TGCA");
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let content = ">seq1\nACGT\nTGCA\nAAAA\n";
        let seqs = parse_fasta_str(content).unwrap();

        assert_eq!(seqs.sequence_count(), 1);
        assert_eq!(seqs[0].data, "ACGTTGCAAAAA");
    }

    #[test]
    fn test_parse_with_description() {
        let content = ">seq1 This is a description\nACGT\n";
        let seqs = parse_fasta_str(content).unwrap();

        assert_eq!(seqs[0].name.as_deref(), Some("seq1"));
        assert_eq!(
            seqs[0].description.as_deref(),
            Some("seq1 This is a description")
        );
    }

    #[test]
    fn test_comments_extend_description() {
        let content = ";file comment\n>seq1 desc\n;more\nAC\n;still more\nGT\n";
        let seqs = parse_fasta_str(content).unwrap();
        assert_eq!(seqs[0].description.as_deref(), Some("seq1 desc\nmore\nstill more"));
        assert_eq!(seqs[0].data, "ACGT");
    }

    #[test]
    fn test_parse_with_empty_lines() {
        let content = ">seq1\nACGT\n\n>seq2\n\nTGCA\n";
        let seqs = parse_fasta_str(content).unwrap();

        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[0].data, "ACGT");
        assert_eq!(seqs[1].data, "TGCA");
    }

    #[test]
    fn test_empty_records_are_kept() {
        let seqs = parse_fasta_str(">a\n>b\nAC\n>\n").unwrap();
        assert_eq!(seqs.sequence_count(), 3);
        assert!(seqs[0].is_empty());
        assert_eq!(seqs[2].name, None);
        assert_eq!(seqs[2].description, None);
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_fasta_str("").unwrap().is_empty());
        assert!(parse_fasta_str("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_sequence_without_header() {
        let err = parse_fasta_str("\nACGT\n>seq1\nTGCA\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_alphabet_checked_per_line() {
        let err = read(Cursor::new(">seq1\nACGT\nACXT\n"), Some(Alphabet::UnambiguousDna)).unwrap_err();
        assert!(matches!(err, ParseError::NotAlphabetic { line: 3, .. }));
    }

    #[test]
    fn test_uppercase_preservation() {
        let seqs = parse_fasta_str(">seq1\nacgt\n").unwrap();
        // Preserves case as-is
        assert_eq!(seqs[0].data, "acgt");
    }

    #[test]
    fn test_read_example() {
        let seqs = parse_fasta_str(EXAMPLE).unwrap();
        assert_eq!(seqs.sequence_count(), 3);
        assert_eq!(seqs[1].name.as_deref(), Some("Hagfish"));
        assert!(seqs.is_aligned());
    }

    #[test]
    fn test_write_wraps_at_80() {
        let seqs = SeqList::new(vec![
            Sequence::new("long", "A".repeat(100)).with_description("long sequence\nsecond line"),
            Sequence::new("short", "CC"),
        ]);
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            ">long sequence\n;second line\n{}\n{}\n\n>short\nCC\n\n",
            "A".repeat(80),
            "A".repeat(20)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_keeps_the_name() {
        let described = Sequence::new("CRAB_ANAPL", "MD").with_description("ALPHA CRYSTALLIN B");
        assert_eq!(header(&described), "CRAB_ANAPL ALPHA CRYSTALLIN B");

        let from_fasta = Sequence::new("seq1", "AC").with_description("seq1 first sequence");
        assert_eq!(header(&from_fasta), "seq1 first sequence");

        let prefix_only = Sequence::new("seq", "AC").with_description("seq1 other");
        assert_eq!(header(&prefix_only), "seq seq1 other");

        assert_eq!(header(&Sequence::new("bare", "AC")), "bare");
        assert_eq!(header(&Sequence::unnamed("AC")), "");

        let seqs = SeqList::new(vec![described]);
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let back = parse_fasta_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(back[0].name.as_deref(), Some("CRAB_ANAPL"));
    }

    #[test]
    fn test_write_round_trip() {
        let seqs = parse_fasta_str(EXAMPLE).unwrap();
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let again = parse_fasta_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(again, seqs);
    }
}
