//! IntelliGenetics (Stanford) sequence format.
//!
//! ```text
//! ;H.sapiens fau mRNA, 518 bases
//! HSFAU
//! ttcctctttctcgactccatcttcgcggtagctgggaccgccgttcagtc
//! gttcagtcaaaaaaaaaa1
//! ```
//!
//! Each record is a run of `;` comment lines, a name line, and residue lines.
//! A final `1` (linear) or `2` (circular) closes the record. In practice the
//! terminator is optional: the next comment line, or the end of input, also
//! closes a record.

use std::io::{self, BufRead, Write};

use super::lines::Lines;
use super::{check_alphabet, strip_whitespace, wrap_residues, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "
;H.sapiens fau mRNA, 518 bases
HSFAU
ttcctctttctcgactccatcttcgcggtagctgggaccgccgttcagtc
actcttaagtcttttgtaattctggctttctctaataaaaaagccactta
gttcagtcaaaaaaaaaa1
;H.sapiens fau 1 gene, 2016 bases
HSFAU1
ctaccattttccctctcgattctatatgtacactcgggacaagttctcct
gatcgaaaacggcaaaactaaggccccaagtaggaatgccttagttttcg
gggttaacaatgattaacactgagcctcacacccacgcgatgccctcagc
tcctcgctcagcgctctcaccaacagccgtagcccgcagccccgctggac
accggttctccatccccgcagcgtagcccggaacatggtagctgccatct
ttacctgctacgccagccttctgtgcgcgcaactgtctggtcccgcccc2
";

const LINE_WIDTH: usize = 80;

#[derive(Default)]
struct Record {
    comments: Vec<String>,
    name: Option<String>,
    data: String,
}

/// Moves a named record into `seqs` and starts a new one.
fn close(record: &mut Record, seqs: &mut Vec<Sequence>, alphabet: Alphabet) {
    let current = std::mem::take(record);
    if let Some(name) = current.name {
        seqs.push(
            Sequence::new(name, current.data)
                .with_description(current.comments.join("\n"))
                .with_alphabet(alphabet),
        );
    }
}

/// Reads IntelliGenetics records. Empty input yields an empty collection.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut seqs = Vec::new();
    let mut record = Record::default();
    let mut lines = Lines::new(reader);

    for line in &mut lines {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix(';') {
            // a comment after a name starts the next record
            if record.name.is_some() {
                close(&mut record, &mut seqs, alphabet);
            }
            record.comments.push(comment.to_string());
        } else if record.name.is_none() {
            record.name = Some(line.to_string());
        } else {
            let (data, terminated) = match line.strip_suffix(|c| c == '1' || c == '2') {
                Some(data) => (data, true),
                None => (line, false),
            };
            let data = strip_whitespace(data);
            check_alphabet(alphabet, number, &data)?;
            record.data.push_str(&data);

            if terminated {
                close(&mut record, &mut seqs, alphabet);
            }
        }
    }

    if record.name.is_some() {
        close(&mut record, &mut seqs, alphabet);
    } else if !record.comments.is_empty() {
        return Err(ParseError::syntax(
            lines.line_number(),
            "IntelliGenetics comment lines without a sequence name",
        ));
    }

    Ok(SeqList::new(seqs))
}

/// Writes `seqs` as IntelliGenetics records, 80 residues per line, each
/// closed with the linear terminator `1`.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    for seq in seqs {
        let name = match seq.name.as_deref() {
            Some(name) if !name.trim().is_empty() && !name.starts_with(';') => name,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "IntelliGenetics records need a sequence name",
                ))
            }
        };

        for comment in seq.description.as_deref().unwrap_or("").lines() {
            writeln!(writer, ";{}", comment)?;
        }
        writeln!(writer, "{}", name)?;

        let lines = wrap_residues(&seq.data, LINE_WIDTH, &['1', '2']);
        if let Some((last, full)) = lines.split_last() {
            for line in full {
                writeln!(writer, "{}", line)?;
            }
            writeln!(writer, "{}1", last)?;
        }
    }
    Ok(())
}
