//! NBRF/PIR sequence format.
//!
//! ```text
//! >P1;CRAB_ANAPL
//! ALPHA CRYSTALLIN B CHAIN (ALPHA(B)-CRYSTALLIN).
//!   MDITIHNPLI RRPLFSWLAP SRIFDQIFGE HLQESELLPA SPSLSPFLMR
//!   SPIFRMPSWL ETGLSEMRLE KDKFSVNLDV KHFSPEELKV KVLGDMVEIH*
//! ```
//!
//! The header holds a two letter sequence type code and the identifier,
//! separated by `;`. The type code selects the alphabet. The line after the
//! header is a free text description, and the residues end with `*`.

use std::io::{self, BufRead, Write};

use super::lines::Lines;
use super::{check_alphabet, strip_whitespace, wrap_residues, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "
>P1;CRAB_ANAPL
ALPHA CRYSTALLIN B CHAIN (ALPHA(B)-CRYSTALLIN).
  MDITIHNPLI RRPLFSWLAP SRIFDQIFGE HLQESELLPA SPSLSPFLMR
  SPIFRMPSWL ETGLSEMRLE KDKFSVNLDV KHFSPEELKV KVLGDMVEIH
  GKHEERQDEH GFIAREFNRK YRIPADVDPL TITSSLSLDG VLTVSAPRKQ
  SDVPERSIPI TREEKPAIAG AQRK*

>P1;CRAB_BOVIN
ALPHA CRYSTALLIN B CHAIN (ALPHA(B)-CRYSTALLIN).
  MDIAIHHPWI RRPFFPFHSP SRLFDQFFGE HLLESDLFPA STSLSPFYLR
  PPSFLRAPSW IDTGLSEMRL EKDRFSVNLD VKHFSPEELK VKVLGDVIEV
  HGKHEERQDE HGFISREFHR KYRIPADVDP LAITSSLSSD GVLTVNGPRK
  QASGPERTIP ITREEKPAVT AAPKK*
";

const LINE_WIDTH: usize = 60;

/// Alphabet implied by an NBRF sequence type code.
pub fn type_code_alphabet(code: &str) -> Option<Alphabet> {
    match code {
        // protein, complete or fragment
        "P1" | "F1" => Some(Alphabet::Protein),
        // DNA, linear or circular
        "DL" | "DC" => Some(Alphabet::Dna),
        // RNA, linear or circular, tRNA, other functional RNA
        "RL" | "RC" | "N3" | "N1" => Some(Alphabet::Rna),
        "XX" => Some(Alphabet::Generic),
        _ => None,
    }
}

/// Type code written for a sequence of the given alphabet.
pub fn alphabet_type_code(alphabet: Alphabet) -> &'static str {
    match alphabet {
        Alphabet::Protein => "P1",
        Alphabet::Dna => "DL",
        Alphabet::Rna => "RL",
        _ => "XX",
    }
}

enum State {
    Body,
    Header,
    Sequence,
}

struct Record {
    name: String,
    description: String,
    alphabet: Alphabet,
    data: String,
}

/// Reads NBRF/PIR records.
///
/// An explicit `alphabet` replaces the alphabet of every type code. Empty
/// input yields an empty collection.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let mut seqs = Vec::new();
    let mut state = State::Body;
    let mut record: Option<Record> = None;
    let mut lines = Lines::new(reader);

    for line in &mut lines {
        let (number, line) = line?;
        match state {
            State::Body => {
                if line.trim().is_empty() {
                    continue;
                }
                let header = line.strip_prefix('>').ok_or_else(|| {
                    ParseError::syntax(number, "sequence data before NBRF header")
                })?;
                let (code, name) = header.split_once(';').ok_or_else(|| {
                    ParseError::syntax(number, "NBRF header needs 'type;identifier'")
                })?;
                if name.contains(';') {
                    return Err(ParseError::syntax(number, "too many ';' in NBRF header"));
                }
                let code_alphabet = type_code_alphabet(code).ok_or_else(|| {
                    ParseError::syntax(number, format!("unknown NBRF sequence type '{}'", code))
                })?;
                record = Some(Record {
                    name: name.trim().to_string(),
                    description: String::new(),
                    alphabet: alphabet.unwrap_or(code_alphabet),
                    data: String::new(),
                });
                state = State::Header;
            }
            State::Header => {
                if let Some(record) = record.as_mut() {
                    record.description = line.trim().to_string();
                }
                state = State::Sequence;
            }
            State::Sequence => {
                if line.starts_with('>') {
                    return Err(ParseError::syntax(
                        number,
                        "new NBRF record before '*' terminator",
                    ));
                }
                let data = strip_whitespace(&line);
                let (data, terminated) = match data.strip_suffix('*') {
                    Some(data) => (data, true),
                    None => (data.as_str(), false),
                };
                if let Some(rec) = record.as_mut() {
                    check_alphabet(rec.alphabet, number, data)?;
                    rec.data.push_str(data);
                }
                if terminated {
                    if let Some(rec) = record.take() {
                        seqs.push(
                            Sequence::new(rec.name, rec.data)
                                .with_description(rec.description)
                                .with_alphabet(rec.alphabet),
                        );
                    }
                    state = State::Body;
                }
            }
        }
    }

    if record.is_some() {
        return Err(ParseError::syntax(
            lines.line_number(),
            "input ends inside an NBRF record (missing '*')",
        ));
    }
    Ok(SeqList::new(seqs))
}

/// Writes `seqs` as NBRF records, 60 residues per line.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    for seq in seqs {
        let name = seq.name_or_empty();
        if name.is_empty() || name.contains(';') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "NBRF records need a sequence name without ';'",
            ));
        }
        writeln!(writer, ">{};{}", alphabet_type_code(seq.alphabet), name)?;
        writeln!(writer, "{}", seq.description.as_deref().unwrap_or(""))?;

        let lines = wrap_residues(&seq.data, LINE_WIDTH, &['*']);
        if let Some((last, full)) = lines.split_last() {
            for line in full {
                writeln!(writer, "{}", line)?;
            }
            writeln!(writer, "{}*", last)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_str(text: &str) -> ParseResult<SeqList> {
        read(Cursor::new(text), None)
    }

    #[test]
    fn test_minimal_record() {
        let seqs = read_str(">P1;ID\nDescription\nAAAA*\n").unwrap();
        assert_eq!(seqs.sequence_count(), 1);
        assert_eq!(seqs[0].name.as_deref(), Some("ID"));
        assert_eq!(seqs[0].description.as_deref(), Some("Description"));
        assert_eq!(seqs[0].data, "AAAA");
        assert_eq!(seqs[0].alphabet, Alphabet::Protein);
    }

    #[test]
    fn test_read_example() {
        let seqs = read_str(EXAMPLE).unwrap();
        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[1].name.as_deref(), Some("CRAB_BOVIN"));
        assert_eq!(
            seqs[0].description.as_deref(),
            Some("ALPHA CRYSTALLIN B CHAIN (ALPHA(B)-CRYSTALLIN).")
        );
        assert!(seqs[0].data.starts_with("MDITIHNPLIRRPLFSWLAP"));
        assert!(seqs[0].data.ends_with("AQRK"));
    }

    #[test]
    fn test_type_codes_select_alphabet() {
        let seqs = read_str(">DL;a\n\nACGT*\n>RC;b\n\nACGU*\n>XX;c\n\nhello*\n").unwrap();
        assert_eq!(seqs[0].alphabet, Alphabet::Dna);
        assert_eq!(seqs[1].alphabet, Alphabet::Rna);
        assert_eq!(seqs[2].alphabet, Alphabet::Generic);
        assert_eq!(seqs[0].description, None);
    }

    #[test]
    fn test_type_code_alphabet_is_enforced() {
        let err = read_str(">DL;a\ndesc\nACGTE*\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_alphabet_override() {
        let seqs = read(Cursor::new(">DL;a\ndesc\nACGTE*\n"), Some(Alphabet::Generic)).unwrap();
        assert_eq!(seqs[0].data, "ACGTE");
        assert_eq!(seqs[0].alphabet, Alphabet::Generic);
    }

    #[test]
    fn test_errors() {
        // residues before any header
        assert_eq!(read_str("ACGT*\n").unwrap_err().line(), Some(1));
        // plain FASTA header
        assert!(read_str(">seq1 some description\nACGT\n").is_err());
        // unknown type code
        assert!(read_str(">ZZ;a\ndesc\nACGT*\n").is_err());
        // record interrupted by the next header
        assert_eq!(read_str(">P1;a\ndesc\nAAAA\n>P1;b\ndesc\nCCCC*\n").unwrap_err().line(), Some(4));
        // missing terminator
        assert!(read_str(">P1;a\ndesc\nAAAA\n").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(read_str("").unwrap().is_empty());
        assert!(read_str("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_write_round_trip() {
        let seqs = read_str(EXAMPLE).unwrap();
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(">P1;CRAB_ANAPL\nALPHA CRYSTALLIN B CHAIN"));
        assert_eq!(read_str(&text).unwrap(), seqs);
    }

    #[test]
    fn test_write_wraps_and_terminates() {
        let seqs = SeqList::new(vec![
            Sequence::new("long", "A".repeat(120)).with_alphabet(Alphabet::Dna),
            Sequence::new("none", ""),
        ]);
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(">DL;long\n\n{a}\n{a}*\n\n>XX;none\n\n*\n\n", a = "A".repeat(60));
        assert_eq!(text, expected);
        assert_eq!(read_str(&text).unwrap(), seqs);
    }

    #[test]
    fn test_write_keeps_stars_off_line_ends() {
        let text = format!(">P1;a\nd\n{}*{}*\n", "A".repeat(59), "C".repeat(10));
        let seqs = read_str(&text).unwrap();
        assert_eq!(seqs[0].len(), 70);

        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let written = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[2], "A".repeat(59));
        assert_eq!(lines[3], format!("*{}*", "C".repeat(10)));
        assert_eq!(read_str(&written).unwrap(), seqs);

        let stars = SeqList::new(vec![Sequence::new("s", format!("A{}", "*".repeat(70)))
            .with_alphabet(Alphabet::Protein)]);
        let mut out = Vec::new();
        write(&mut out, &stars).unwrap();
        assert_eq!(read_str(&String::from_utf8(out).unwrap()).unwrap(), stars);
    }
}
