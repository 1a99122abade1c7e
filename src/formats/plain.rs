//! Raw sequence data: the whole input is one unnamed sequence.
//!
//! Whitespace and line breaks are ignored. Because nearly any text is valid
//! raw data, this format is only used when asked for by name or extension.

use std::io::{self, BufRead, Write};

use super::lines::Lines;
use super::{check_alphabet, strip_whitespace, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "
--------------------------LENSTSPYDYGENESD-------FSDSPPCPQDF
--------------------------LENLEDLF-WELDRLD------NYNDTSLVENH-
--------------------------MSNITDPQMWDFDDLN-------FTGMPPADEDY
-----------------------------------YTSDN---------YSGSGDYDSNK
-SL-------NFDRTFLPALYSLLFLLGLLGNGAVAAVLLSQRTALSSTDTFLLHLAVAD
--LC-PATMASFKAVFVPVAYSLIFLLGVIGNVLVLVILERHRQTRSSTETFLFHLAVAD
-SPC-MLETETLNKYVVIIAYALVFLLSLLGNSLVMLVILYSRVGRSVTDVYLLNLALAD
-EPC-RDENVHFNRIFLPTIYFIIFLTGIV
";

/// Reads the input as a single sequence.
///
/// A line starting with `>` (most likely FASTA) is an error. Input with no
/// residues yields an empty collection.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut data = String::new();

    for line in Lines::new(reader) {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            return Err(ParseError::syntax(number, "'>' header in raw sequence data"));
        }
        let chunk = strip_whitespace(line);
        check_alphabet(alphabet, number, &chunk)?;
        data.push_str(&chunk);
    }

    if data.is_empty() {
        return Ok(SeqList::default());
    }
    Ok(SeqList::new(vec![
        Sequence::unnamed(data).with_alphabet(alphabet)
    ]))
}

/// Writes raw residues, one sequence per line.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    for seq in seqs {
        writeln!(writer, "{}", seq.data)?;
    }
    Ok(())
}
