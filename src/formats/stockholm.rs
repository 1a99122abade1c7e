//! Stockholm alignment format, as used by Pfam and HMMER.
//!
//! Annotation lines (`#=GF`, `#=GS`, `#=GR`, `#=GC` and plain comments) are
//! skipped. The `# STOCKHOLM 1.x` header is mandatory and `//` ends the
//! alignment.

use std::io::BufRead;

use lazy_static::lazy_static;
use regex::Regex;

use super::scanner::{fold_blocks, BlockGrammar, Lead, Row, Scanner};
use super::ParseResult;
use crate::alphabet::Alphabet;
use crate::model::SeqList;

pub const EXAMPLE: &str = "
# STOCKHOLM 1.0
#=GF ID CBS
#=GF AC PF00571
#=GF DE CBS domain
#=GF AU Bateman A
#=GF CC CBS domains are small intracellular modules mostly found
#=GF CC in 2 or four copies within a protein.
#=GF SQ 67
#=GS O31698/18-71 AC O31698
#=GS O83071/192-246 AC O83071
#=GS O83071/259-312 AC O83071
#=GS O31698/88-139 AC O31698
#=GS O31698/88-139 OS Bacillus subtilis
O83071/192-246          MTCRAQLIAVPRASSLAE..AIACAQKM....RVSRVPVYERS
#=GR O83071/192-246 SA  999887756453524252..55152525....36463774777
O83071/259-312          MQHVSAPVFVFECTRLAY..VQHKLRAH....SRAVAIVLDEY
#=GR O83071/259-312 SS  CCCCCHHHHHHHHHHHHH..EEEEEEEE....EEEEEEEEEEE
O31698/18-71            MIEADKVAHVQVGNNLEH..ALLVLTKT....GYTAIPVLDPS
#=GR O31698/18-71 SS    CCCHHHHHHHHHHHHHHH..EEEEEEEE....EEEEEEEEHHH
O31698/88-139           EVMLTDIPRLHINDPIMK..GFGMVINN......GFVCVENDE
#=GR O31698/88-139 SS   CCCCCCCHHHHHHHHHHH..HEEEEEEE....EEEEEEEEEEH
#=GC SS_cons            CCCCCHHHHHHHHHHHHH..EEEEEEEE....EEEEEEEEEEH
O31699/88-139           EVMLTDIPRLHINDPIMK..GFGMVINN......GFVCVENDE
#=GR O31699/88-139 AS   ________________*__________________________
#=GR_O31699/88-139_IN   ____________1______________2__________0____
//
";

lazy_static! {
    static ref HEADER_LINE: Regex = Regex::new(r"^#\s+STOCKHOLM\s+1\.\d\s*$").unwrap();
}

struct Stockholm;

impl BlockGrammar for Stockholm {
    const REQUIRED_HEADER: Option<&'static str> = Some("# STOCKHOLM 1.x");

    fn lead(&self, line: &str) -> Lead {
        if HEADER_LINE.is_match(line) {
            Lead::Header
        } else {
            Lead::Reject("expected '# STOCKHOLM 1.x' header".to_string())
        }
    }

    fn row(&self, line: &str) -> Row {
        if line.trim() == "//" {
            return Row::Terminator;
        }
        if line.starts_with('#') {
            return Row::Skip;
        }
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        match (parts.next(), parts.next().map(str::trim)) {
            (Some(id), Some(data)) if !data.is_empty() => Row::Sequence {
                id: id.to_string(),
                data: data.to_string(),
                number: None,
            },
            _ => Row::Reject(format!("expected 'name residues', got '{}'", line.trim())),
        }
    }
}

/// Reads a Stockholm alignment.
///
/// A missing header (including empty input) is an error. A missing `//`
/// terminator is tolerated at end of input.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    fold_blocks(Scanner::new(reader, Stockholm), alphabet, false)
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
        assert_eq!(seqs.sequence_count(), 5);
        assert_eq!(seqs[0].name.as_deref(), Some("O83071/192-246"));
        assert_eq!(seqs[0].data, "MTCRAQLIAVPRASSLAE..AIACAQKM....RVSRVPVYERS");
        assert_eq!(seqs[4].name.as_deref(), Some("O31699/88-139"));
    }

    #[test]
    fn test_interleaved_blocks_repeat_names() {
        let text = "# STOCKHOLM 1.0\n\nseq1 ACGT\nseq2 ACGA\n\nseq1 TTTT\nseq2 GGGG\n//\n";
        let seqs = read_str(text).unwrap();
        assert_eq!(seqs.sequence_count(), 2);
        assert_eq!(seqs[0].data, "ACGTTTTT");
        assert_eq!(seqs[1].data, "ACGAGGGG");
    }

    #[test]
    fn test_annotation_block_is_ignored() {
        let text = "# STOCKHOLM 1.0\n#=GF ID X\n\nseq1 ACGT\n\n#=GC SS_cons ....\n//\n";
        let seqs = read_str(text).unwrap();
        assert_eq!(seqs.sequence_count(), 1);
    }

    #[test]
    fn test_header_required() {
        assert!(read_str("seq1 ACGT\n//\n").is_err());
        assert!(read_str("").is_err());
        assert!(read_str("\n  \n").is_err());
    }

    #[test]
    fn test_text_after_terminator_is_ignored() {
        let text = "# STOCKHOLM 1.0\nseq1 ACGT\n//\nnot part of the alignment\n";
        assert_eq!(read_str(text).unwrap().sequence_count(), 1);
    }

    #[test]
    fn test_missing_terminator_is_tolerated() {
        let seqs = read_str("# STOCKHOLM 1.0\nseq1 ACGT\n").unwrap();
        assert_eq!(seqs[0].data, "ACGT");
    }

    #[test]
    fn test_row_without_residues() {
        let err = read_str("# STOCKHOLM 1.0\nseq1 ACGT\nseq2\n//\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(read_str("# STOCKHOLM 1.0\n//\n").unwrap().is_empty());
    }
}
