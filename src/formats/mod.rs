//! Multi-format sequence file reader.
//!
//! Every format lives in its own module exposing a `read` function (and a
//! `write` function when the format can be produced) plus a small `EXAMPLE`
//! document. [`FileFormat`] is the registry tying them together.
//!
//! Format detection priority:
//! 1. Explicit format specification (-f option)
//! 2. File extension, matched against format names then extensions
//! 3. Trial parsing in [`FileFormat::DISPATCH_ORDER`], rewinding the input
//!    after every failed attempt
//!
//! The dispatch order puts stricter formats first so that a looser reader
//! never accepts a file that belongs to a stricter one (NBRF before FASTA,
//! the block formats before the line-per-sequence table and array formats).

pub mod array;
pub mod clustal;
pub mod fasta;
pub mod genbank;
pub mod intelligenetics;
pub mod lines;
pub mod msf;
pub mod nbrf;
pub mod nexus;
pub mod phylip;
pub mod plain;
pub mod scanner;
pub mod stockholm;
pub mod table;

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::model::SeqList;

/// A supported file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Clustal,
    Fasta,
    Plain,
    Msf,
    Genbank,
    Nbrf,
    Nexus,
    Phylip,
    Stockholm,
    IntelliGenetics,
    Table,
    Array,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors that can occur while reading or writing a sequence file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Character on line {line} not in alphabet {alphabet}: {text}")]
    NotAlphabetic {
        line: usize,
        alphabet: Alphabet,
        text: String,
    },

    #[error("Inconsistent line lengths on line {line}: expected {expected}, found {found}")]
    InconsistentLineLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected} sequences but found {found}")]
    SequenceCountMismatch { expected: usize, found: usize },

    #[error("Sequence '{name}' has length {found}, expected {expected}")]
    SequenceLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Invalid(String),

    #[error("The {format} format does not support {operation}")]
    Unsupported {
        format: FileFormat,
        operation: &'static str,
    },

    #[error("Cannot parse sequence file: tried {}", .tried.join(", "))]
    UnknownFormat { tried: Vec<&'static str> },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// The 1-based input line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::NotAlphabetic { line, .. }
            | ParseError::InconsistentLineLength { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Fails with [`ParseError::NotAlphabetic`] unless `text` belongs to `alphabet`.
pub(crate) fn check_alphabet(alphabet: Alphabet, line: usize, text: &str) -> ParseResult<()> {
    if alphabet.alphabetic(text) {
        Ok(())
    } else {
        Err(ParseError::NotAlphabetic {
            line,
            alphabet,
            text: text.to_string(),
        })
    }
}

/// Removes every whitespace character from a residue line.
pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits residues into lines of at most `width` characters for record
/// formats whose last residue line ends with a terminator. Lines other than
/// the last never end with one of `terminators`; they are shortened instead,
/// and the remainder goes on the last line when that is impossible. The last
/// line is always present, possibly empty.
pub(crate) fn wrap_residues<'a>(data: &'a str, width: usize, terminators: &[char]) -> Vec<&'a str> {
    let mut lines = Vec::new();
    let mut rest = data;
    while let Some((cut, _)) = rest.char_indices().nth(width) {
        let line = rest[..cut].trim_end_matches(terminators);
        if line.is_empty() {
            break;
        }
        lines.push(line);
        rest = &rest[line.len()..];
    }
    lines.push(rest);
    lines
}

impl FileFormat {
    /// All formats, in registry order.
    pub const ALL: [FileFormat; 12] = [
        FileFormat::Clustal,
        FileFormat::Fasta,
        FileFormat::Plain,
        FileFormat::Msf,
        FileFormat::Genbank,
        FileFormat::Nbrf,
        FileFormat::Nexus,
        FileFormat::Phylip,
        FileFormat::Stockholm,
        FileFormat::IntelliGenetics,
        FileFormat::Table,
        FileFormat::Array,
    ];

    /// Order in which formats are tried on input of unknown format.
    ///
    /// Plain and IntelliGenetics are only used when asked for by name or
    /// extension: the plain reader accepts nearly anything.
    pub const DISPATCH_ORDER: [FileFormat; 10] = [
        FileFormat::Nbrf,
        FileFormat::Fasta,
        FileFormat::Clustal,
        FileFormat::Phylip,
        FileFormat::Genbank,
        FileFormat::Stockholm,
        FileFormat::Msf,
        FileFormat::Nexus,
        FileFormat::Table,
        FileFormat::Array,
    ];

    /// Preferred name of the format.
    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    /// Names the format is known by, preferred name first. Always lowercase.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            FileFormat::Clustal => &["clustal", "clustalw"],
            FileFormat::Fasta => &["fasta", "pearson", "fa"],
            FileFormat::Plain => &["plain", "raw"],
            FileFormat::Msf => &["msf", "gcg-msf", "gcg", "pileup"],
            FileFormat::Genbank => &["genbank"],
            FileFormat::Nbrf => &["nbrf", "pir"],
            FileFormat::Nexus => &["nexus", "paup"],
            FileFormat::Phylip => &["phylip"],
            FileFormat::Stockholm => &["stockholm", "pfam"],
            FileFormat::IntelliGenetics => &["intelligenetics", "ig", "stanford"],
            FileFormat::Table => &["table", "tab"],
            FileFormat::Array => &["array", "flatfile"],
        }
    }

    /// File extensions (without the dot) conventionally used by the format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFormat::Clustal => &["aln"],
            FileFormat::Fasta => &[
                "fa", "fasta", "fast", "seq", "fsa", "fst", "nt", "aa", "fna", "mpfa", "faa",
                "fnn", "mfasta", "tfa", "pfa",
            ],
            FileFormat::Plain => &[],
            FileFormat::Msf => &["msf"],
            FileFormat::Genbank => &["gb", "genbank", "gbk"],
            FileFormat::Nbrf => &["nbrf", "pir", "ali"],
            FileFormat::Nexus => &["nex", "nexus", "paup", "nxs"],
            FileFormat::Phylip => &["phy"],
            FileFormat::Stockholm => &["sth", "stockholm", "align"],
            FileFormat::IntelliGenetics => &["ig"],
            FileFormat::Table => &["tbl"],
            FileFormat::Array => &[],
        }
    }

    /// Whether [`FileFormat::write`] is available for this format.
    pub fn can_write(self) -> bool {
        matches!(
            self,
            FileFormat::Clustal
                | FileFormat::Fasta
                | FileFormat::Plain
                | FileFormat::Nbrf
                | FileFormat::IntelliGenetics
                | FileFormat::Table
                | FileFormat::Array
        )
    }

    /// A short, valid document in this format.
    pub fn example(self) -> &'static str {
        match self {
            FileFormat::Clustal => clustal::EXAMPLE,
            FileFormat::Fasta => fasta::EXAMPLE,
            FileFormat::Plain => plain::EXAMPLE,
            FileFormat::Msf => msf::EXAMPLE,
            FileFormat::Genbank => genbank::EXAMPLE,
            FileFormat::Nbrf => nbrf::EXAMPLE,
            FileFormat::Nexus => nexus::EXAMPLE,
            FileFormat::Phylip => phylip::EXAMPLE,
            FileFormat::Stockholm => stockholm::EXAMPLE,
            FileFormat::IntelliGenetics => intelligenetics::EXAMPLE,
            FileFormat::Table => table::EXAMPLE,
            FileFormat::Array => array::EXAMPLE,
        }
    }

    /// Reads the whole input as this format.
    ///
    /// `alphabet` overrides any alphabet the format itself declares; without
    /// it, residues are checked against the format's own default.
    pub fn read<R: BufRead>(self, reader: R, alphabet: Option<Alphabet>) -> ParseResult<SeqList> {
        match self {
            FileFormat::Clustal => clustal::read(reader, alphabet),
            FileFormat::Fasta => fasta::read(reader, alphabet),
            FileFormat::Plain => plain::read(reader, alphabet),
            FileFormat::Msf => msf::read(reader, alphabet),
            FileFormat::Genbank => genbank::read(reader, alphabet),
            FileFormat::Nbrf => nbrf::read(reader, alphabet),
            FileFormat::Nexus => nexus::read(reader, alphabet),
            FileFormat::Phylip => phylip::read(reader, alphabet),
            FileFormat::Stockholm => stockholm::read(reader, alphabet),
            FileFormat::IntelliGenetics => intelligenetics::read(reader, alphabet),
            FileFormat::Table => table::read(reader, alphabet),
            FileFormat::Array => array::read(reader, alphabet),
        }
    }

    /// Writes `seqs` in this format.
    pub fn write<W: Write>(self, writer: &mut W, seqs: &SeqList) -> ParseResult<()> {
        match self {
            FileFormat::Clustal => clustal::write(writer, seqs)?,
            FileFormat::Fasta => fasta::write(writer, seqs)?,
            FileFormat::Plain => plain::write(writer, seqs)?,
            FileFormat::Nbrf => nbrf::write(writer, seqs)?,
            FileFormat::IntelliGenetics => intelligenetics::write(writer, seqs)?,
            FileFormat::Table => table::write(writer, seqs)?,
            FileFormat::Array => array::write(writer, seqs)?,
            FileFormat::Msf
            | FileFormat::Genbank
            | FileFormat::Nexus
            | FileFormat::Phylip
            | FileFormat::Stockholm => {
                return Err(ParseError::Unsupported {
                    format: self,
                    operation: "writing",
                })
            }
        }
        Ok(())
    }

    /// Looks a format up by any of its names (case insensitive).
    pub fn from_name(name: &str) -> Option<FileFormat> {
        FORMAT_NAMES.get(name.to_lowercase().as_str()).copied()
    }

    /// Looks a format up by file extension, without the dot (case insensitive).
    pub fn from_extension(extension: &str) -> Option<FileFormat> {
        FORMAT_EXTENSIONS
            .get(extension.to_lowercase().as_str())
            .copied()
    }
}

fn build_table(keys: fn(FileFormat) -> &'static [&'static str]) -> HashMap<&'static str, FileFormat> {
    let mut table = HashMap::new();
    for format in FileFormat::ALL {
        for &key in keys(format) {
            table.entry(key).or_insert(format);
        }
    }
    table
}

lazy_static! {
    static ref FORMAT_NAMES: HashMap<&'static str, FileFormat> = build_table(FileFormat::names);
    static ref FORMAT_EXTENSIONS: HashMap<&'static str, FileFormat> =
        build_table(FileFormat::extensions);
}

/// Read-only map from every format name to its format.
pub fn format_names() -> &'static HashMap<&'static str, FileFormat> {
    &FORMAT_NAMES
}

/// Read-only map from every known file extension to its format.
pub fn format_extensions() -> &'static HashMap<&'static str, FileFormat> {
    &FORMAT_EXTENSIONS
}

/// Detects format from file extension.
///
/// The extension is first looked up as a format name (`seqs.pir`,
/// `seqs.clustal`), then as a registered extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    FileFormat::from_name(ext).or_else(|| FileFormat::from_extension(ext))
}

/// Formats to try, in order, given an optional hint.
///
/// The hinted format goes first. It may be one that blind detection never
/// tries, such as plain.
pub fn trial_order(hint: Option<FileFormat>) -> Vec<FileFormat> {
    let mut order = Vec::with_capacity(FileFormat::DISPATCH_ORDER.len() + 1);
    order.extend(hint);
    order.extend(
        FileFormat::DISPATCH_ORDER
            .iter()
            .copied()
            .filter(|&f| Some(f) != hint),
    );
    order
}

/// Reads input of unknown format, returning the sequences and the format
/// that accepted them.
///
/// `name` is the file name the input came from, if any; its extension
/// decides which format is tried first. Each failed attempt rewinds the
/// input to offset zero before the next format is tried. I/O failures end
/// the search immediately.
pub fn sniff<R: BufRead + Seek>(
    mut reader: R,
    name: Option<&Path>,
    alphabet: Option<Alphabet>,
) -> ParseResult<(SeqList, FileFormat)> {
    let hint = name.and_then(detect_format_from_extension);
    let mut tried = Vec::new();

    for format in trial_order(hint) {
        debug!("Trying {} reader", format);
        match format.read(&mut reader, alphabet) {
            Ok(seqs) => {
                debug!("{} reader accepted {} sequences", format, seqs.sequence_count());
                return Ok((seqs, format));
            }
            Err(ParseError::Io(e)) => return Err(ParseError::Io(e)),
            Err(e) => {
                debug!("{} reader rejected input: {}", format, e);
                tried.push(format.name());
                reader.seek(SeekFrom::Start(0))?;
            }
        }
    }

    Err(ParseError::UnknownFormat { tried })
}

/// Reads input of unknown format. See [`sniff`].
pub fn read<R: BufRead + Seek>(
    reader: R,
    name: Option<&Path>,
    alphabet: Option<Alphabet>,
) -> ParseResult<SeqList> {
    sniff(reader, name, alphabet).map(|(seqs, _)| seqs)
}

/// Parses a sequence file with optional format specification.
///
/// Without a forced format the file extension and then trial parsing
/// decide, as in [`sniff`].
pub fn read_file<P: AsRef<Path>>(
    path: P,
    forced_format: Option<FileFormat>,
    alphabet: Option<Alphabet>,
) -> ParseResult<(SeqList, FileFormat)> {
    let path = path.as_ref();
    let reader = BufReader::with_capacity(1024 * 1024, File::open(path)?);

    let (seqs, format) = match forced_format {
        Some(format) => (format.read(reader, alphabet)?, format),
        None => sniff(reader, Some(path), alphabet)?,
    };
    info!(
        "Read {} sequences from {} as {}",
        seqs.sequence_count(),
        path.display(),
        format
    );
    Ok((seqs, format))
}
