//! seqsniff - Sequence file format detector and converter
//!
//! Reads a sequence file of known or unknown format and either summarizes
//! it or writes it back out in another format.
//!
//! ## Usage
//!
//! ```bash
//! seqsniff <sequence_file>                  # Detect format, list sequences
//! seqsniff -f nexus <sequence_file>         # Force format
//! seqsniff -o out.aln -t clustal <file>     # Convert
//! cat seqs.txt | seqsniff -o - -           # Read stdin, write FASTA to stdout
//! seqsniff --list-formats
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use seqsniff::alphabet::Alphabet;
use seqsniff::formats::{self, FileFormat};
use seqsniff::model::SeqList;

/// Input format specification for command line
#[derive(Debug, Clone, Copy)]
enum FormatArg {
    /// Auto-detect from extension and content
    Auto,
    Named(FileFormat),
}

impl From<FormatArg> for Option<FileFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => None,
            FormatArg::Named(format) => Some(format),
        }
    }
}

fn parse_format_arg(value: &str) -> Result<FormatArg, String> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(FormatArg::Auto);
    }
    parse_format_name(value).map(FormatArg::Named)
}

fn parse_format_name(value: &str) -> Result<FileFormat, String> {
    FileFormat::from_name(value).ok_or_else(|| {
        format!(
            "unknown format '{}' (see --list-formats)",
            value
        )
    })
}

/// seqsniff - Read, identify and convert biological sequence files
///
/// Without -o/--output, prints the detected format and one line per sequence.
/// With -o/--output, writes the sequences in the --to format (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sequence file to read. Use "-" for stdin.
    #[arg(required_unless_present_any = ["list_formats", "example"])]
    file: Option<PathBuf>,

    /// Force a specific input format (overrides auto-detection)
    #[arg(short = 'f', long = "format", value_parser = parse_format_arg, default_value = "auto")]
    format: FormatArg,

    /// Alphabet the residues must belong to (generic, protein, dna, rna, ...)
    #[arg(short = 'a', long = "alphabet")]
    alphabet: Option<Alphabet>,

    /// Output file (enables conversion). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Output format used with -o/--output
    #[arg(short = 't', long = "to", value_parser = parse_format_name, default_value = "fasta")]
    to: FileFormat,

    /// List the known formats, their names and extensions, and exit
    #[arg(long = "list-formats")]
    list_formats: bool,

    /// Print a short example document in the given format and exit
    #[arg(long = "example", value_parser = parse_format_name, value_name = "FORMAT")]
    example: Option<FileFormat>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn list_formats() {
    println!("{:<16} {:<8} {:<34} extensions", "format", "writes", "names");
    for format in FileFormat::ALL {
        println!(
            "{:<16} {:<8} {:<34} {}",
            format.name(),
            if format.can_write() { "yes" } else { "no" },
            format.names().join(", "),
            format.extensions().join(", ")
        );
    }
}

/// Reads standard input into memory so that format trials can rewind it.
fn read_stdin(
    forced_format: Option<FileFormat>,
    alphabet: Option<Alphabet>,
) -> Result<(SeqList, FileFormat)> {
    let mut buffer = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut buffer)
        .context("Failed to read standard input")?;
    let reader = Cursor::new(buffer);

    let result = match forced_format {
        Some(format) => (format.read(reader, alphabet)?, format),
        None => formats::sniff(reader, None, alphabet)?,
    };
    info!(
        "Read {} sequences from standard input as {}",
        result.0.sequence_count(),
        result.1
    );
    Ok(result)
}

/// Writes the detected format, then one `name  length` row per sequence
/// with names padded to a common width.
fn write_summary<W: Write>(out: &mut W, seqs: &SeqList, format: FileFormat) -> io::Result<()> {
    writeln!(
        out,
        "# {}: {} sequences{}",
        format,
        seqs.sequence_count(),
        if seqs.is_aligned() && !seqs.is_empty() {
            format!(", aligned, length {}", seqs.alignment_length())
        } else {
            String::new()
        }
    )?;
    let width = seqs.max_name_length().max(1);
    for seq in seqs {
        writeln!(
            out,
            "{:<width$}  {}",
            seq.name.as_deref().unwrap_or("-"),
            seq.len(),
            width = width
        )?;
    }
    Ok(())
}

/// Writes the sequences in `format` to a file, or to stdout for "-".
fn write_output(seqs: &SeqList, format: FileFormat, output: &str) -> Result<()> {
    if output == "-" {
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());
        format.write(&mut handle, seqs)?;
        handle.flush()?;
    } else {
        let file = File::create(output).with_context(|| format!("Cannot create {}", output))?;
        let mut writer = BufWriter::new(file);
        format.write(&mut writer, seqs)?;
        writer.flush()?;
        eprintln!(
            "Wrote {} sequences to {} as {}",
            seqs.sequence_count(),
            output,
            format
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_formats {
        list_formats();
        return Ok(());
    }
    if let Some(format) = args.example {
        print!("{}", format.example().trim_start());
        return Ok(());
    }

    let Some(file_path) = args.file else {
        anyhow::bail!("No input file given");
    };
    let forced_format: Option<FileFormat> = args.format.into();

    let (seqs, format) = if file_path == Path::new("-") {
        read_stdin(forced_format, args.alphabet)?
    } else {
        formats::read_file(&file_path, forced_format, args.alphabet)
            .with_context(|| format!("Failed to read {}", file_path.display()))?
    };

    match args.output {
        Some(output) => write_output(&seqs, args.to, &output)?,
        None => write_summary(&mut io::stdout().lock(), &seqs, format)?,
    }

    Ok(())
}
