//! GCG Multiple Sequence Format (MSF), also written by PileUp.
//!
//! Everything up to the `//` line is header (`MSF:`, `Name:` lines, ...)
//! and is skipped. After it, blocks of `name  residues` rows follow, with
//! residues grouped in runs of ten. Ruler lines made of two numbers are
//! ignored.

use std::io::BufRead;

use lazy_static::lazy_static;
use regex::Regex;

use super::scanner::{fold_blocks, BlockGrammar, Lead, Row, Scanner};
use super::{strip_whitespace, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::SeqList;

pub const EXAMPLE: &str = "

 PileUp


MSF: 64 Type: P Check: 767 ..

 Name: Cow              Len:   100  Check: 3761  Weight:  1.00
 Name: Carp             Len:   100  Check: 1550  Weight:  1.00
 Name: Chicken          Len:   100  Check: 2397  Weight:  1.00
 Name: Human            Len:   100  Check: 9021  Weight:  1.00
 Name: Loach            Len:   100  Check:  984  Weight:  1.00
 Name: Mouse            Len:   100  Check: 2993  Weight:  1.00


//


    Cow  MAYPMQLGFQ DATSPIMEEL LHFHDHTLMI VFLISSLVLY IISLMLTTKL
   Carp  MAHPTQLGFK DAAMPVMEEL LHFHDHALMI VLLISTLVLY IITAMVSTKL
Chicken  MANHSQLGFQ DASSPIMEEL VEFHDHALMV ALAICSLVLY LLTLMLMEKL
  Human  MAHAAQVGLQ DATSPIMEEL ITFHDHALMI IFLICFLVLY ALFLTLTTKL
  Loach  MAHPTQLGFQ DAASPVMEEL LHFHDHALMI VFLISALVLY VIITTVSTKL
  Mouse  MAYPFQLGLQ DATSPIMEEL MNFHDHTLMI VFLISSLVLY IISLMLTTKL


    Cow  THTSTMDAQE VETIWTILPA IILILIALPS LRILYMMDEI NNPSLTVKTM
   Carp  TNKYILDSQE IEIVWTILPA VILVLIALPS LRILYLMDEI NDPHLTIKAM
Chicken  S.SNTVDAQE VELIWTILPA IVLVLLALPS LQILYMMDEI DEPDLTLKAI
  Human  TNTNISDAQE METVWTILPA IILVLIALPS LRILYMTDEV NDPSLTIKSI
  Loach  TNMYILDSQE IEIVWTVLPA LILILIALPS LRILYLMDEI NDPHLTIKAM
  Mouse  THTSTMDAQE VETIWTILPA VILIMIALPS LRILYMMDEI NNPVLTVKTM

";

lazy_static! {
    static ref END_HEADER: Regex = Regex::new(r"^//\s*$").unwrap();
    static ref SEQ_LINE: Regex = Regex::new(r"^\s*(\S+)\s+(.+)$").unwrap();
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

struct Msf;

impl BlockGrammar for Msf {
    fn lead(&self, line: &str) -> Lead {
        if END_HEADER.is_match(line) {
            Lead::Header
        } else {
            Lead::Skip
        }
    }

    fn row(&self, line: &str) -> Row {
        let caps = match SEQ_LINE.captures(line) {
            Some(caps) => caps,
            None => return Row::Reject(format!("expected 'name residues', got '{}'", line.trim())),
        };
        let (name, rest) = (&caps[1], &caps[2]);
        if is_number(name) && is_number(rest.trim()) {
            return Row::Skip;
        }
        Row::Sequence {
            id: name.to_string(),
            data: strip_whitespace(rest),
            number: None,
        }
    }
}

/// Reads an MSF alignment. Input without any sequence row is an error.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let seqs = fold_blocks(Scanner::new(reader, Msf), alphabet, false)?;
    if seqs.is_empty() {
        return Err(ParseError::Invalid(
            "No MSF sequence rows found after '//'".to_string(),
        ));
    }
    Ok(seqs)
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
        assert_eq!(seqs.sequence_count(), 6);
        assert_eq!(seqs[0].name.as_deref(), Some("Cow"));
        assert_eq!(seqs[5].name.as_deref(), Some("Mouse"));
        assert_eq!(seqs[2].len(), 100);
        assert!(seqs[2].data.starts_with("MANHSQLGFQDASSPIMEEL"));
        assert!(seqs[2].data.contains("S.SNTVDAQE"));
    }

    #[test]
    fn test_ruler_lines_are_skipped() {
        let text = "MSF: 8 ..\n//\n\n           1       8\n  a  ACGT ACGT\n  b  ACGT ACGA\n";
        let seqs = read_str(text).unwrap();
        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[1].data, "ACGTACGA");
    }

    #[test]
    fn test_empty_is_error() {
        assert!(read_str("").is_err());
        assert!(read_str("MSF: 64 Type: P Check: 767 ..\n//\n\n").is_err());
    }

    #[test]
    fn test_missing_separator_is_error() {
        assert!(read_str("EC0001\tMKRIST\nEC0002\tMRVLKF\n").is_err());
    }

    #[test]
    fn test_single_token_row_is_error() {
        let err = read_str("//\n\nCow\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }
}
