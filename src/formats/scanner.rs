//! Block scanner shared by the interleaved alignment formats.
//!
//! Clustal, Stockholm and MSF files all have the same shape: some lead-in
//! text (ending with, or consisting of, a header line), then blocks of
//! `name residues` rows separated by blank lines. Each block holds one chunk
//! of every sequence.
//!
//! ```text
//! begin
//!   header?
//!   (begin_block (seq_id seq seq_num?)* match_line? end_block)*
//! end
//! ```
//!
//! The [`Scanner`] turns lines into that token stream; a [`BlockGrammar`]
//! supplies the per-format line rules. [`fold_blocks`] then assembles the
//! token stream into sequences.

use std::collections::VecDeque;
use std::io::BufRead;

use log::trace;

use super::lines::Lines;
use super::{check_alphabet, ParseError, ParseResult};
use crate::alphabet::Alphabet;
use crate::model::{SeqList, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Begin,
    Header,
    BeginBlock,
    SeqId,
    Seq,
    SeqNum,
    MatchLine,
    EndBlock,
    End,
}

/// One scanner token. `line` is the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: Option<String>,
    pub line: usize,
}

impl Token {
    fn new(kind: TokenKind, data: Option<String>, line: usize) -> Self {
        Self { kind, data, line }
    }
}

/// What a non-blank line seen before the first block means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lead {
    /// The header line; blocks follow.
    Header,
    /// Lead-in text to ignore.
    Skip,
    /// Not a header, but a block starts here.
    Body,
    Reject(String),
}

/// What a non-blank line inside a block means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Sequence {
        id: String,
        data: String,
        number: Option<String>,
    },
    /// Conservation line under a Clustal block.
    Match(String),
    /// Annotation or ruler.
    Skip,
    /// End of the alignment; the rest of the input is ignored.
    Terminator,
    Reject(String),
}

/// Line rules of one block format.
pub trait BlockGrammar {
    /// Set when input that ends before any header is an error. Holds the
    /// header description used in the message.
    const REQUIRED_HEADER: Option<&'static str> = None;

    fn lead(&self, line: &str) -> Lead;

    fn row(&self, line: &str) -> Row;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Body,
    Block,
    Done,
}

/// Pull-based token scanner. Yields tokens until `End`, or a single error.
pub struct Scanner<R, G> {
    lines: Lines<R>,
    grammar: G,
    state: State,
    started: bool,
    pending: VecDeque<Token>,
}

impl<R: BufRead, G: BlockGrammar> Scanner<R, G> {
    pub fn new(reader: R, grammar: G) -> Self {
        Self {
            lines: Lines::new(reader),
            grammar,
            state: State::Header,
            started: false,
            pending: VecDeque::new(),
        }
    }

    fn emit(&mut self, kind: TokenKind, data: Option<String>, line: usize) {
        self.pending.push_back(Token::new(kind, data, line));
    }

    fn advance(&mut self) -> ParseResult<()> {
        if !self.started {
            self.started = true;
            self.emit(TokenKind::Begin, None, 0);
            return Ok(());
        }
        match self.lines.next() {
            Some(line) => {
                let (number, text) = line?;
                self.consume(number, &text)
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> ParseResult<()> {
        let last = self.lines.line_number();
        match self.state {
            State::Header => {
                if let Some(header) = G::REQUIRED_HEADER {
                    return Err(ParseError::Invalid(format!("Missing {} header", header)));
                }
            }
            State::Block => self.emit(TokenKind::EndBlock, None, last),
            State::Body | State::Done => {}
        }
        self.emit(TokenKind::End, None, last);
        self.state = State::Done;
        Ok(())
    }

    fn consume(&mut self, number: usize, line: &str) -> ParseResult<()> {
        let blank = line.trim().is_empty();

        if self.state == State::Header {
            if blank {
                return Ok(());
            }
            match self.grammar.lead(line) {
                Lead::Header => {
                    trace!("line {}: header", number);
                    self.emit(TokenKind::Header, Some(line.trim().to_string()), number);
                    self.state = State::Body;
                    return Ok(());
                }
                Lead::Skip => return Ok(()),
                // re-read this line as the start of the first block
                Lead::Body => self.state = State::Body,
                Lead::Reject(message) => return Err(ParseError::syntax(number, message)),
            }
        }

        if self.state == State::Body {
            if blank {
                return Ok(());
            }
            trace!("line {}: begin block", number);
            self.emit(TokenKind::BeginBlock, None, number);
            self.state = State::Block;
        }

        if blank {
            self.emit(TokenKind::EndBlock, None, number);
            self.state = State::Body;
            return Ok(());
        }

        match self.grammar.row(line) {
            Row::Sequence { id, data, number: seq_num } => {
                self.emit(TokenKind::SeqId, Some(id), number);
                self.emit(TokenKind::Seq, Some(data), number);
                if let Some(n) = seq_num {
                    self.emit(TokenKind::SeqNum, Some(n), number);
                }
            }
            Row::Match(text) => self.emit(TokenKind::MatchLine, Some(text), number),
            Row::Skip => {}
            Row::Terminator => {
                trace!("line {}: terminator", number);
                self.emit(TokenKind::EndBlock, None, number);
                self.emit(TokenKind::End, None, number);
                self.state = State::Done;
            }
            Row::Reject(message) => return Err(ParseError::syntax(number, message)),
        }
        Ok(())
    }
}

impl<R: BufRead, G: BlockGrammar> Iterator for Scanner<R, G> {
    type Item = ParseResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.state == State::Done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.state = State::Done;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Folds a block token stream into sequences.
///
/// The rows of the first block name the sequences and fix their order.
/// Every later block must hold exactly one row per sequence; its row names
/// are not checked, chunks are appended by position. Blocks without any
/// sequence row (annotation only) are ignored. With `equal_widths`, all
/// rows of a block must be as long as its first row.
pub fn fold_blocks<I>(tokens: I, alphabet: Alphabet, equal_widths: bool) -> ParseResult<SeqList>
where
    I: IntoIterator<Item = ParseResult<Token>>,
{
    let mut ids: Vec<String> = Vec::new();
    let mut chunks: Vec<String> = Vec::new();
    let mut blocks = 0;
    let mut row = 0;
    let mut width = 0;

    for token in tokens {
        let token = token?;
        match token.kind {
            TokenKind::BeginBlock => row = 0,
            TokenKind::SeqId => {
                if blocks == 0 && ids.len() <= row {
                    ids.push(token.data.unwrap_or_default());
                    chunks.push(String::new());
                }
            }
            TokenKind::Seq => {
                let data = token.data.unwrap_or_default();
                check_alphabet(alphabet, token.line, &data)?;
                if row >= ids.len() {
                    return Err(ParseError::syntax(
                        token.line,
                        format!("block has more rows than the {} sequences of the first block", ids.len()),
                    ));
                }
                if equal_widths {
                    if row == 0 {
                        width = data.len();
                    } else if data.len() != width {
                        return Err(ParseError::InconsistentLineLength {
                            line: token.line,
                            expected: width,
                            found: data.len(),
                        });
                    }
                }
                chunks[row].push_str(&data);
                row += 1;
            }
            TokenKind::EndBlock if row > 0 => {
                if row != ids.len() {
                    return Err(ParseError::syntax(
                        token.line,
                        format!("block has {} rows, expected {}", row, ids.len()),
                    ));
                }
                blocks += 1;
            }
            _ => {}
        }
    }

    Ok(ids
        .into_iter()
        .zip(chunks)
        .map(|(id, data)| Sequence::new(id, data).with_alphabet(alphabet))
        .collect())
}
