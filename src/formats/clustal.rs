//! Clustal alignment format (ClustalW, ClustalX and Clustal Omega output).
//!
//! ```text
//! CLUSTAL W (1.81) multiple sequence alignment
//!
//!
//! CXCR3_MOUSE       -SL-------NFDRTFLPALYSLLFLLGLLGNGAVAAVLLSQRTALSSTDTFLLHLAVAD
//! BLR_HUMAN         --LC-PATMASFKAVFVPVAYSLIFLLGVIGNVLVLVILERHRQTRSSTETFLFHLAVAD
//!                      :.  .:   * ::** .::**  *  ::   :   * *: : ::*::**
//! ```
//!
//! The `CLUSTAL` header is expected but not required. Each row holds a name,
//! a chunk of residues and an optional running residue count. Every row of
//! a block must carry the same number of residues.

use std::io::{self, BufRead, Write};

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use super::scanner::{fold_blocks, BlockGrammar, Lead, Row, Scanner};
use super::ParseResult;
use crate::alphabet::Alphabet;
use crate::model::SeqList;

pub const EXAMPLE: &str = "
CLUSTAL W (1.81) multiple sequence alignment


CXCR3_MOUSE       --------------------------LENSTSPYDYGENESD-------FSDSPPCPQDF
BLR_HUMAN         --------------------------LENLEDLF-WELDRLD------NYNDTSLVENH-
CXCR1_HUMAN       --------------------------MSNITDPQMWDFDDLN-------FTGMPPADEDY
CXCR4_MURINE      -----------------------------------YTSDN---------YSGSGDYDSNK
                                                     :  :          :..     ..

CXCR3_MOUSE       -SL-------NFDRTFLPALYSLLFLLGLLGNGAVAAVLLSQRTALSSTDTFLLHLAVAD
BLR_HUMAN         --LC-PATMASFKAVFVPVAYSLIFLLGVIGNVLVLVILERHRQTRSSTETFLFHLAVAD
CXCR1_HUMAN       -SPC-MLETETLNKYVVIIAYALVFLLSLLGNSLVMLVILYSRVGRSVTDVYLLNLALAD
CXCR4_MURINE      -EPC-RDENVHFNRIFLPTIYFIIFLTGIVGNGLVILVMGYQKKLRSMTDKYRLHLSVAD
                             :.  .:   * ::** .::**  *  ::   :   * *: : ::*::**

CXCR3_MOUSE       VLLVLTLPLWAVDAA-VQWVFGPGLCKVAGALFNINFYAGAFLLACISFDRYLSIVHATQ
BLR_HUMAN         LLLVFILPFAVAEGS-VGWVLGTFLCKTVIALHKVNFYCSSLLLACIAVDRYLAIVHAVH
CXCR1_HUMAN       LLFALTLPIWAASKV-NGWIFGTFLCKVVSLLKEVNFYSGILLLACISVDRYLAIVHATR
CXCR4_MURINE      LLFVITLPFWAVDAM-ADWYFGKFLCKAVHIIYTVNLYSSVLILAFISLDRYLAIVHATN
                  :*:.: **: ...     * :*  ***..  :  :*:*.. ::** *:.****:****..
";

const HEADER: &str = "CLUSTAL W (1.81) multiple sequence alignment";
const NAME_WIDTH: usize = 17;
const LINE_WIDTH: usize = 60;

lazy_static! {
    static ref HEADER_LINE: Regex = Regex::new(r"^CLUSTAL").unwrap();
    static ref SEQ_LINE: Regex = Regex::new(r"^(\s*\S+\s+)(\S+)\s*(\d*)\s*$").unwrap();
    static ref MATCH_LINE: Regex = Regex::new(r"^[\s:.*]*$").unwrap();
}

struct Clustal;

impl BlockGrammar for Clustal {
    fn lead(&self, line: &str) -> Lead {
        if HEADER_LINE.is_match(line) {
            Lead::Header
        } else {
            Lead::Body
        }
    }

    fn row(&self, line: &str) -> Row {
        if MATCH_LINE.is_match(line) {
            return Row::Match(line.to_string());
        }
        match SEQ_LINE.captures(line) {
            Some(caps) => Row::Sequence {
                id: caps[1].trim().to_string(),
                data: caps[2].to_string(),
                number: caps
                    .get(3)
                    .map(|m| m.as_str())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
            },
            None => Row::Reject(format!("not a Clustal alignment row: '{}'", line)),
        }
    }
}

/// Reads a Clustal alignment. Input without any block is an empty alignment.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    fold_blocks(Scanner::new(reader, Clustal), alphabet, true)
}

/// Writes `seqs` as a Clustal alignment, 60 residues per row.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList) -> io::Result<()> {
    if !seqs.is_aligned() {
        warn!("Writing sequences of unequal length as a Clustal alignment");
    }
    for seq in seqs {
        match seq.name.as_deref() {
            Some(name) if !name.is_empty() && !name.contains(char::is_whitespace) => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Clustal rows need a sequence name without whitespace",
                ))
            }
        }
    }

    writeln!(writer, "{}", HEADER)?;
    writeln!(writer)?;
    writeln!(writer)?;

    let length = seqs.alignment_length();
    for start in (0..length).step_by(LINE_WIDTH) {
        for seq in seqs {
            writeln!(
                writer,
                "{:<width$} {}",
                seq.name_or_empty(),
                seq.slice(start, start + LINE_WIDTH),
                width = NAME_WIDTH
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
