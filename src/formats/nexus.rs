//! NEXUS reader, limited to the character matrix of a DATA or CHARACTERS
//! block.
//!
//! ```text
//! #NEXUS
//! begin characters;
//!   dimensions ntax=2 nchar=8;
//!   format datatype=protein interleave;
//!   matrix
//!     'taxon one' MKVL
//!     taxon_2     MRVL
//!
//!     'taxon one' AQWE
//!     taxon_2     AQWD
//!   ;
//! end;
//! ```
//!
//! Commands are case insensitive and run up to the next `;`, so they may
//! span lines. Bracketed comments (possibly nested) are dropped everywhere.
//! DIMENSIONS are checked against the matrix, FORMAT supplies DATATYPE,
//! INTERLEAVE and MATCHCHAR, and every other command or block is skipped.
//! A file without any sequence is an error.

use std::collections::HashMap;
use std::io::BufRead;

use super::lines::Lines;
use super::{ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

pub const EXAMPLE: &str = "#NEXUS
[Primate mitochondrial DNA, first 60 sites]

BEGIN DATA;
  DIMENSIONS NTAX=5 NCHAR=60;
  FORMAT DATATYPE=DNA MISSING=? GAP=-;
  MATRIX
    Human       AAGCTTCACCGGCGCAGTCATTCTCATAATCGCCCACGGACTTACATCCTCATTACTATT
    Chimpanzee  AAGCTTCACCGGCGCAATTATCCTCATAATCGCCCACGGACTTACATCCTCATTATTATT
    Gorilla     AAGCTTCACCGGCGCAGTTGTTCTTATAATTGCCCACGGACTTACATCATCATTATTATT
    Orangutan   AAGCTTCACCGGCGCAACCACCCTCATGATTGCCCATGGACTCACATCCTCCCTACTGTT
    Gibbon      AAGCTTTACAGGTGCAACCGTCCTCATAATCGCCCACGGACTAACCTCTTCCCTGCTATT
  ;
END;
";

/// Settings collected from the DIMENSIONS and FORMAT commands.
#[derive(Debug, Default)]
struct Layout {
    ntax: Option<usize>,
    nchar: Option<usize>,
    interleave: bool,
    matchchar: Option<char>,
    datatype: Option<Alphabet>,
}

impl Layout {
    fn dimensions(&mut self, params: &HashMap<String, String>) -> ParseResult<()> {
        self.ntax = dimension(params, "NTAX")?;
        self.nchar = dimension(params, "NCHAR")?;
        Ok(())
    }

    fn format(&mut self, params: &HashMap<String, String>) {
        self.interleave = params
            .get("INTERLEAVE")
            .map_or(false, |v| !v.eq_ignore_ascii_case("NO"));
        self.matchchar = params.get("MATCHCHAR").and_then(|v| v.chars().next());
        self.datatype = params
            .get("DATATYPE")
            .map(|v| datatype_alphabet(&v.to_uppercase()));
    }
}

/// A matrix word. Quoted words may contain whitespace.
#[derive(Debug)]
struct Token {
    text: String,
    quoted: bool,
}

/// Parses a NEXUS document.
///
/// An explicit `alphabet` takes precedence over the FORMAT DATATYPE.
pub fn read<R: BufRead>(reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
    let mut content = String::new();
    let mut seen_header = false;

    for line in Lines::new(reader) {
        let (number, line) = line?;
        if !seen_header {
            if line.trim().is_empty() {
                continue;
            }
            if !line.trim_start().to_uppercase().starts_with("#NEXUS") {
                return Err(ParseError::syntax(
                    number,
                    "Not a NEXUS file (must start with #NEXUS)",
                ));
            }
            seen_header = true;
            continue;
        }
        content.push_str(&line);
        content.push('\n');
    }

    if !seen_header {
        return Err(ParseError::Invalid("Empty NEXUS file".to_string()));
    }

    let text = strip_comments(&content);
    let (layout, matrix) = scan_data_block(&text)?;
    build_sequences(matrix.unwrap_or(""), &layout, alphabet)
}

/// Walks the commands of the first DATA or CHARACTERS block, returning its
/// layout and the body of its MATRIX command.
fn scan_data_block(text: &str) -> ParseResult<(Layout, Option<&str>)> {
    let mut in_block = false;
    let mut layout = Layout::default();
    let mut matrix = None;

    for command in split_commands(text) {
        let (word, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let word = word.to_uppercase();

        if !in_block {
            let block = rest.split_whitespace().next().unwrap_or("").to_uppercase();
            in_block = word == "BEGIN" && (block == "DATA" || block == "CHARACTERS");
            continue;
        }
        match word.as_str() {
            "END" | "ENDBLOCK" => break,
            "DIMENSIONS" => layout.dimensions(&parameters(rest))?,
            "FORMAT" => layout.format(&parameters(rest)),
            "MATRIX" => matrix = Some(rest),
            _ => {}
        }
    }

    if !in_block {
        return Err(ParseError::Invalid(
            "No DATA or CHARACTERS block found".to_string(),
        ));
    }
    Ok((layout, matrix))
}

/// Alphabet implied by a FORMAT DATATYPE value.
fn datatype_alphabet(datatype: &str) -> Alphabet {
    match datatype {
        "DNA" => Alphabet::Dna,
        "RNA" => Alphabet::Rna,
        "NUCLEOTIDE" => Alphabet::Nucleic,
        "PROTEIN" => Alphabet::Protein,
        _ => Alphabet::Generic,
    }
}

/// Turns the MATRIX body into sequences, checking them against the layout.
fn build_sequences(
    matrix: &str,
    layout: &Layout,
    alphabet: Option<Alphabet>,
) -> ParseResult<SeqList> {
    let alphabet = alphabet.or(layout.datatype).unwrap_or_default();
    let mut rows = if layout.interleave {
        parse_interleaved(matrix)
    } else {
        parse_sequential(&matrix_tokens(matrix), layout.ntax, layout.nchar)?
    };

    if rows.is_empty() {
        return Err(ParseError::Invalid("No sequences in NEXUS MATRIX".to_string()));
    }

    if let Some(ntax) = layout.ntax {
        if rows.len() != ntax {
            return Err(ParseError::SequenceCountMismatch {
                expected: ntax,
                found: rows.len(),
            });
        }
    }

    if let Some(mc) = layout.matchchar {
        expand_matchchar(&mut rows, mc);
    }

    rows.into_iter()
        .map(|(name, data)| {
            let found = data.chars().count();
            match layout.nchar {
                Some(expected) if found != expected => {
                    return Err(ParseError::SequenceLengthMismatch {
                        name,
                        expected,
                        found,
                    })
                }
                _ => {}
            }
            if let Some(c) = alphabet.first_invalid(&data) {
                return Err(ParseError::Invalid(format!(
                    "Sequence '{}' contains '{}', not in alphabet {}",
                    name, c, alphabet
                )));
            }
            Ok(Sequence::new(name, data).with_alphabet(alphabet))
        })
        .collect()
}

fn dimension(params: &HashMap<String, String>, name: &str) -> ParseResult<Option<usize>> {
    match params.get(name) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ParseError::Invalid(format!("Invalid DIMENSIONS: {}={}", name, value))
        }),
    }
}

/// Removes bracketed comments, which may nest. Line breaks and quoted text
/// are kept.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match (quote, c) {
            (Some(q), _) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            (None, '\n') => out.push(c),
            (None, '[') => depth += 1,
            (None, ']') if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Splits text into `;` terminated commands, trimmed. A trailing command
/// without `;` is kept.
fn split_commands(text: &str) -> Vec<&str> {
    let mut commands = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ';') => {
                commands.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        commands.push(tail);
    }
    commands.retain(|c| !c.is_empty());
    commands
}

/// Reads `KEY=VALUE` pairs and bare `KEY` flags. Keys are uppercased,
/// values are kept as written.
fn parameters(text: &str) -> HashMap<String, String> {
    let spaced = text.replace('=', " = ");
    let mut words = spaced.split_whitespace().peekable();
    let mut params = HashMap::new();

    while let Some(word) = words.next() {
        let value = if words.next_if_eq(&"=").is_some() {
            words.next().unwrap_or("")
        } else {
            ""
        };
        params.insert(word.to_uppercase(), value.to_string());
    }
    params
}

/// Splits matrix text into words. Quotes group words and are removed.
fn matrix_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '\'' || c == '"' {
            let text = chars.by_ref().take_while(|&x| x != c).collect();
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::from(c);
            while let Some(x) = chars.next_if(|x| !x.is_whitespace()) {
                text.push(x);
            }
            tokens.push(Token { text, quoted: false });
        }
    }
    tokens
}

/// Replaces MATCHCHAR with the residue of the first sequence at that column.
fn expand_matchchar(rows: &mut [(String, String)], matchchar: char) {
    let Some(((_, first), rest)) = rows.split_first_mut() else {
        return;
    };
    let reference: Vec<char> = first.chars().collect();

    for (_, data) in rest {
        *data = data
            .chars()
            .zip(reference.iter().map(Some).chain(std::iter::repeat(None)))
            .map(|(c, r)| match r {
                Some(&r) if c == matchchar => r,
                _ => c,
            })
            .collect();
    }
}

/// Sequential layout: each name is followed by all of its residues, which
/// may span several words and lines. NCHAR decides where a sequence ends;
/// without it a name-like word does.
fn parse_sequential(
    tokens: &[Token],
    ntax: Option<usize>,
    nchar: Option<usize>,
) -> ParseResult<Vec<(String, String)>> {
    let mut rows: Vec<(String, String)> = Vec::new();
    let mut tokens = tokens.iter().peekable();

    while ntax.map_or(true, |n| rows.len() < n) {
        let Some(name) = tokens.next() else {
            break;
        };
        if rows.iter().any(|(n, _)| *n == name.text) {
            return Err(ParseError::Invalid(format!(
                "Duplicate sequence name: '{}'",
                name.text
            )));
        }

        let mut data = String::new();
        while let Some(token) = tokens.peek() {
            let full = match nchar {
                Some(nchar) => data.len() >= nchar,
                None => !data.is_empty() && looks_like_name(token),
            };
            if full {
                break;
            }
            data.push_str(&token.text);
            tokens.next();
        }
        rows.push((name.text.clone(), data));
    }

    if let Some(extra) = tokens.next() {
        return Err(ParseError::Invalid(format!(
            "Unexpected '{}' after the last NEXUS MATRIX sequence",
            extra.text
        )));
    }
    Ok(rows)
}

/// Interleaved layout: every row starts with a taxon name, and names repeat
/// in each block.
fn parse_interleaved(matrix: &str) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in matrix.lines() {
        let tokens = matrix_tokens(line);
        let Some((name, data)) = tokens.split_first() else {
            continue;
        };
        let data: String = data.iter().map(|t| t.text.as_str()).collect();
        match index.get(&name.text) {
            Some(&i) => rows[i].1.push_str(&data),
            None => {
                index.insert(name.text.clone(), rows.len());
                rows.push((name.text.clone(), data));
            }
        }
    }
    rows
}

/// Guesses whether a word is a taxon name rather than residues. Only used
/// when NCHAR is unknown.
fn looks_like_name(token: &Token) -> bool {
    let text = token.text.as_str();
    token.quoted
        || text.contains('_')
        || (text.bytes().any(|b| b.is_ascii_alphabetic()) && text.bytes().any(|b| b.is_ascii_digit()))
}
