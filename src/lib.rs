//! # seqsniff - Multi-format sequence file reader
//!
//! Reads the common multiple sequence alignment and sequence database text
//! formats, and guesses the format of a file whose format is not known.
//!
//! ## Architecture
//!
//! - `alphabet`: Residue character sets used to validate parsed data
//! - `model`: Sequences and ordered sequence collections
//! - `formats`: One reader (and possibly a writer) per file format, the
//!   format registry and the auto-detecting dispatcher
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use seqsniff::formats;
//!
//! let text = ">P1;ID\nDescription\nAAAA*\n";
//! let (seqs, format) = formats::sniff(Cursor::new(text), None, None).unwrap();
//! assert_eq!(format, formats::FileFormat::Nbrf);
//! assert_eq!(seqs.get(0).unwrap().data, "AAAA");
//! ```

pub mod alphabet;
pub mod formats;
pub mod model;
