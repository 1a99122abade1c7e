//! PHYLIP format parser.
//!
//! Reads the interleaved PHYLIP layout, of which a file with a single block
//! (the sequential layout with one line per species) is a special case.
//!
//! ## PHYLIP Format
//!
//! The first line contains the number of species, the sequence length and
//! optional single letter options:
//! ```text
//!   6   50   W
//! ```
//!
//! Every option other than `U` adds one option line at the top of each
//! block. In the first block, the first ten columns of a species line hold
//! the species name and the rest holds residues. Later blocks hold residues
//! only. A count line followed by that many user trees may close the file.
//!
//! ```text
//!   2   20
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//!
//! GTGTGTGTGT
//! CACACACACA
//! ```

use std::io::BufRead;

use super::lines::{split_at_column, Lines};
use super::{check_alphabet, strip_whitespace, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "  6   50   W
W         0101001111 0101110101 01011
dmras1    GTCGTCGTTG GACCTGGAGG CGTGG
hschras   GTGGTGGTGG GCGCCGGCCG TGTGG
ddrasa    GTTATTGTTG GTGGTGGTGG TGTCG
spras     GTAGTTGTAG GAGATGGTGG TGTTG
scras1    GTAGTTGTCG GTGGAGGTGG CGTTG
scras2    GTCGTCGTTG GTGGTGGTGG TGTTG

0101001111 0101110101 01011
GTCGTCGTTG GACCTGGAGG CGTGG
GTGGTGGTGG GCGCCGGCCG TGTGG
GTTATTGTTG GTGGTGGTGG TGTCG
GTAGTTGTAG GAGATGGTGG TGTTG
GTAGTTGTCG GTGGAGGTGG CGTTG
GTCGTCGTTG GTGGTGGTGG TGTTG

1
((dmras1,ddrasa),((hschras,spras),(scras1,scras2)));
";

/// Width of the species name field.
const NAME_WIDTH: usize = 10;

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_count(text: &str, line: usize) -> ParseResult<usize> {
    text.parse()
        .map_err(|_| ParseError::syntax(line, format!("'{}' is not a valid count", text)))
}

/// Option lines expected per block: every option letter except `U`.
fn option_lines(options: &str) -> usize {
    options.chars().filter(|&c| c != 'U').count()
}

/// Parses a PHYLIP alignment.
///
/// Each line is classified, in this order, as: user tree count, option
/// line, user tree, header, sequence data. Empty input is an error.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let alphabet = alphabet.unwrap_or_default();
    let mut names: Vec<String> = Vec::new();
    let mut data: Vec<String> = Vec::new();
    let mut header: Option<(usize, usize)> = None;
    let mut options = String::new();
    let mut pending_options = 0;
    let mut row = 0;
    let mut user_trees = 0;

    for line in Lines::new(reader) {
        let (number, line) = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = fields.first() else {
            continue;
        };
        let (species, length) = header.unwrap_or((0, 0));

        if is_number(first)
            && fields.len() == 1
            && species > 0
            && data.len() == species
            && data[0].len() == length
        {
            user_trees = parse_count(first, number)?;
        } else if pending_options > 0 {
            if data.len() < species {
                let letter = first.chars().next().unwrap_or(' ');
                if !options.contains(letter) {
                    return Err(ParseError::syntax(
                        number,
                        format!("expected an option line for one of '{}'", options),
                    ));
                }
            }
            pending_options -= 1;
        } else if user_trees > 0 {
            if data.last().map_or(true, |d| d.len() != length) {
                return Err(ParseError::syntax(number, "user tree before the end of the data"));
            }
            user_trees -= 1;
        } else if is_number(first) {
            if fields.len() < 2 || !data.is_empty() {
                return Err(ParseError::syntax(number, "unexpected number"));
            }
            let species = parse_count(first, number)?;
            let length = parse_count(fields[1], number)?;
            header = Some((species, length));
            options = fields[2..].concat();
            pending_options = option_lines(&options);
        } else {
            if species == 0 {
                return Err(ParseError::syntax(
                    number,
                    "expected a PHYLIP header giving species count and sequence length",
                ));
            }
            if data.len() < species {
                let (name, rest) = split_at_column(&line, NAME_WIDTH);
                let chunk = strip_whitespace(rest);
                check_alphabet(alphabet, number, &chunk)?;
                names.push(name.trim().to_string());
                data.push(chunk);
            } else {
                let chunk = fields.concat();
                check_alphabet(alphabet, number, &chunk)?;
                data[row].push_str(&chunk);
            }
            row += 1;
            if row == species {
                row = 0;
                pending_options = option_lines(&options);
            }
        }
    }

    let (species, length) = header
        .ok_or_else(|| ParseError::Invalid("Missing PHYLIP header".to_string()))?;

    if data.len() != species {
        return Err(ParseError::SequenceCountMismatch {
            expected: species,
            found: data.len(),
        });
    }

    names
        .into_iter()
        .zip(data)
        .map(|(name, data)| {
            if data.len() == length {
                Ok(Sequence::new(name, data).with_alphabet(alphabet))
            } else {
                Err(ParseError::SequenceLengthMismatch {
                    name,
                    expected: length,
                    found: data.len(),
                })
            }
        })
        .collect()
}
