//! Flat alignment: one unnamed, equal length sequence per line.

use std::io::{self, BufRead, Write};

use log::warn;

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
-EPC-RDENVHFNRIFLPTIYFIIFLTGIVGNGLVILVMGYQKKLRSMTDKYRLHLSVAD
";

/// Reads one sequence per non-blank line. Every line must have the length
/// of the first.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut seqs: Vec<Sequence> = Vec::new();

    for line in Lines::new(reader) {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            return Err(ParseError::syntax(number, "'>' header in sequence array"));
        }

        let data = strip_whitespace(line);
        check_alphabet(alphabet, number, &data)?;
        if let Some(first) = seqs.first() {
            if first.len() != data.len() {
                return Err(ParseError::InconsistentLineLength {
                    line: number,
                    expected: first.len(),
                    found: data.len(),
                });
            }
        }
        seqs.push(Sequence::unnamed(data).with_alphabet(alphabet));
    }

    Ok(SeqList::new(seqs))
}

/// Writes the residues of each sequence on a line of its own. Names and
/// descriptions are dropped.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    if !seqs.is_aligned() {
        warn!("Writing sequences of unequal length as an array");
    }
    for seq in seqs {
        writeln!(writer, "{}", seq.data)?;
    }
    Ok(())
}
