//! Two column, tab separated sequence table: `name<TAB>residues`.

use std::io::{self, BufRead, Write};

use super::lines::Lines;
use super::{check_alphabet, strip_whitespace, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "
EC0001\tMKRISTTITTTITITTGNGAG
EC0002\tMRVLKFGGTSVANAERFLRVADILESNARQGQVATVLSAPAKITNHLVAM
EC0003\tMVKVYAPASSANMSVGFDVLGAAVTPVDGALLGDVVTVEAAETFSLNNLG
EC0004\tMKLYNLKDHNEQVSFAQAVTQGLGKNQGLFFPHDLPEFSLTEIDEMLKLD
EC0005\tMKKMQSIVLALSLVLVAPMAAQAAEITLVPSVKLQIGDRDNRGYYWDGGH
EC0006\tMLILISPAKTLDYQSPLTTTRYTLPELLDNSQQLIHEARKLTPPQISTLM
EC0007\tMPDFFSFINSVLWGSVMIYLLFGAGCWFTFRTGFVQFRYIRQFGKSLKNS
EC0008\tMTDKLTSLRQYTTVVADTGDIAAMKLYQPQDATTNPSLILNAAQIPEYRK
EC0009\tMNTLRIGLVSISDRASSGVYQDKGIPALEEWLTSALTTPFELETRLIPDE
EC0010\tMGNTKLANPAPLGLMGFGMTTILLNLHNVGYFALDGIILAMGIFYGGIAQ
";

/// Reads a sequence table. Every non-blank line must hold exactly two
/// tab separated columns.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut seqs = Vec::new();

    for line in Lines::new(reader) {
        let (number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }

        // an empty sequence leaves a trailing tab, so only spaces are trimmed
        let columns: Vec<&str> = line.trim_matches(' ').split('\t').collect();
        let [name, residues] = columns[..] else {
            return Err(ParseError::syntax(
                number,
                format!("expected two tab separated columns, found {}", columns.len()),
            ));
        };
        let data = strip_whitespace(residues);
        check_alphabet(alphabet, number, &data)?;
        seqs.push(Sequence::new(name.trim(), data).with_alphabet(alphabet));
    }

    Ok(SeqList::new(seqs))
}

/// Writes one `name<TAB>residues` line per sequence.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    for seq in seqs {
        let name = seq.name_or_empty();
        if name.trim().is_empty() || name.contains(&['\t', '\n', '\r'][..]) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "table rows need a sequence name without tabs or line breaks",
            ));
        }
        writeln!(writer, "{}\t{}", name, seq.data)?;
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
    fn test_read_example() {
        let seqs = read_str(EXAMPLE).unwrap();
        assert_eq!(seqs.sequence_count(), 10);
        assert_eq!(seqs[0].name.as_deref(), Some("EC0001"));
        assert_eq!(seqs[0].len(), 21);
        assert_eq!(seqs[9].len(), 50);
        assert!(!seqs.is_aligned());
    }

    #[test]
    fn test_column_count() {
        assert_eq!(read_str("a\tACGT\nb ACGT\n").unwrap_err().line(), Some(2));
        assert!(read_str("a\tAC\tGT\n").is_err());
    }

    #[test]
    fn test_empty_sequence_round_trip() {
        let seqs = SeqList::new(vec![Sequence::new("a", ""), Sequence::new("b", "AC")]);
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "a\t\nb\tAC\n");
        assert_eq!(read_str(&text).unwrap(), seqs);
        assert_eq!(read_str("a\t  \n").unwrap()[0].data, "");
    }

    #[test]
    fn test_empty_input() {
        assert!(read_str("").unwrap().is_empty());
    }

    #[test]
    fn test_alphabet() {
        let err = read(Cursor::new("a\tACGT\nb\tACGZ\n"), Some(Alphabet::Dna)).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_write_round_trip() {
        let seqs = read_str(EXAMPLE).unwrap();
        let mut out = Vec::new();
        write(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("EC0001\tMKRISTTITTTITITTGNGAG\n"));
        assert_eq!(read_str(&text).unwrap(), seqs);
    }

    #[test]
    fn test_write_rejects_bad_names() {
        for name in ["", "two\tcolumns"] {
            let seqs = SeqList::new(vec![Sequence::new(name, "ACGT")]);
            assert!(write(&mut Vec::<u8>::new(), &seqs).is_err());
        }
        let seqs = SeqList::new(vec![Sequence::unnamed("ACGT")]);
        assert!(write(&mut Vec::<u8>::new(), &seqs).is_err());
    }
}
