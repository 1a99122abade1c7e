//! Numbered line source over any buffered reader.

use std::io::{BufRead, ErrorKind};

use super::{ParseError, ParseResult};

/// Iterator over the lines of a reader, yielding `(line_number, text)`.
///
/// Line numbers are 1-based. Line terminators (`\n` or `\r\n`) are removed.
/// Input that is not valid UTF-8 is reported as a syntax error on the line
/// where it occurs, so that the dispatcher treats it as "not this format".
pub struct Lines<R> {
    reader: R,
    number: usize,
    done: bool,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            number: 0,
            done: false,
        }
    }

    /// Number of the last line returned (0 before the first line).
    pub fn line_number(&self) -> usize {
        self.number
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = ParseResult<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.number += 1;
                let len = buf.trim_end_matches(['\n', '\r']).len();
                buf.truncate(len);
                Some(Ok((self.number, buf)))
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                self.done = true;
                Some(Err(ParseError::syntax(self.number + 1, "input is not valid UTF-8 text")))
            }
            Err(e) => {
                self.done = true;
                Some(Err(ParseError::Io(e)))
            }
        }
    }
}

/// Splits `line` after its first `column` characters.
///
/// Shorter lines are returned whole, followed by an empty remainder.
pub(crate) fn split_at_column(line: &str, column: usize) -> (&str, &str) {
    match line.char_indices().nth(column) {
        Some((idx, _)) => line.split_at(idx),
        None => (line, ""),
    }
}
