use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write};

use seqsniff::alphabet::Alphabet;
use seqsniff::formats::{self, FileFormat, ParseError};

#[test]
fn test_every_example_reads_as_itself() {
    for format in FileFormat::ALL {
        let seqs = format
            .read(Cursor::new(format.example()), None)
            .unwrap_or_else(|e| panic!("{} rejected its own example: {}", format, e));
        assert!(!seqs.is_empty(), "{} example is empty", format);
    }
}

#[test]
fn test_earlier_formats_reject_later_examples() {
    let order = FileFormat::DISPATCH_ORDER;
    for (i, earlier) in order.iter().enumerate() {
        for later in &order[i + 1..] {
            let result = earlier.read(Cursor::new(later.example()), None);
            assert!(
                result.is_err(),
                "{} reader accepted the {} example",
                earlier,
                later
            );
        }
    }
}

#[test_log::test]
fn test_sniff_is_deterministic() {
    for format in FileFormat::DISPATCH_ORDER {
        let first = formats::sniff(Cursor::new(format.example()), None, None).unwrap();
        let second = formats::sniff(Cursor::new(format.example()), None, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.1, format);
    }
}

#[test]
fn test_empty_input_contract() {
    let empty_ok = [
        FileFormat::Nbrf,
        FileFormat::Fasta,
        FileFormat::Clustal,
        FileFormat::Genbank,
        FileFormat::IntelliGenetics,
        FileFormat::Plain,
        FileFormat::Table,
        FileFormat::Array,
    ];
    for format in FileFormat::ALL {
        let result = format.read(Cursor::new(""), None);
        if empty_ok.contains(&format) {
            assert!(result.unwrap().is_empty(), "{}", format);
        } else {
            assert!(result.is_err(), "{} accepted empty input", format);
        }
    }

    let (seqs, format) = formats::sniff(Cursor::new(""), None, None).unwrap();
    assert!(seqs.is_empty());
    assert_eq!(format, FileFormat::DISPATCH_ORDER[0]);
}

#[test_log::test]
fn test_extension_hint_changes_interpretation() {
    // also a valid single block Clustal alignment of three rows
    let text = "2 1\nalpha     C\nbeta      G\n";

    let (seqs, format) = formats::sniff(Cursor::new(text), None, None).unwrap();
    assert_eq!(format, FileFormat::Clustal);
    assert_eq!(seqs.sequence_count(), 3);

    let mut file = tempfile::Builder::new().suffix(".phy").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();

    let (seqs, format) = formats::read_file(file.path(), None, None).unwrap();
    assert_eq!(format, FileFormat::Phylip);
    assert_eq!(seqs.sequence_count(), 2);
    assert_eq!(seqs[0].name.as_deref(), Some("alpha"));
    assert_eq!(seqs[1].data, "G");
}

#[test]
fn test_wrong_extension_falls_back_to_content() {
    let mut file = tempfile::Builder::new().suffix(".aln").tempfile().unwrap();
    file.write_all(FileFormat::Nexus.example().as_bytes()).unwrap();
    file.flush().unwrap();

    let (seqs, format) = formats::read_file(file.path(), None, None).unwrap();
    assert_eq!(format, FileFormat::Nexus);
    assert_eq!(seqs.sequence_count(), 5);
}

#[test]
fn test_read_file_with_forced_format() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(FileFormat::Plain.example().as_bytes()).unwrap();
    file.flush().unwrap();

    let (seqs, format) =
        formats::read_file(file.path(), Some(FileFormat::Plain), None).unwrap();
    assert_eq!(format, FileFormat::Plain);
    assert_eq!(seqs.sequence_count(), 1);

    let err = formats::read_file(file.path(), Some(FileFormat::Stockholm), None).unwrap_err();
    assert!(!matches!(err, ParseError::UnknownFormat { .. }));
}

#[test]
fn test_alphabet_applies_to_every_trial() {
    let text = ">seq1\nACGT\n>seq2\nAC-T\n";
    let (seqs, format) = formats::sniff(Cursor::new(text), None, Some(Alphabet::Dna)).unwrap();
    assert_eq!(format, FileFormat::Fasta);
    assert!(seqs.iter().all(|s| s.alphabet == Alphabet::Dna));

    let err = formats::sniff(Cursor::new(text), None, Some(Alphabet::UnambiguousDna)).unwrap_err();
    assert!(matches!(err, ParseError::UnknownFormat { .. }));
}

#[test]
fn test_undecodable_input_is_a_parse_failure() {
    let bytes: &[u8] = b"\xff\xfe\xfd\n";
    let err = formats::sniff(Cursor::new(bytes), None, None).unwrap_err();
    match err {
        ParseError::UnknownFormat { tried } => {
            assert_eq!(tried.len(), FileFormat::DISPATCH_ORDER.len())
        }
        other => panic!("unexpected error {:?}", other),
    }
}

/// A source that fails with a hard I/O error once its first byte is read.
struct Failing {
    inner: Cursor<Vec<u8>>,
}

impl Read for Failing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.inner.position() > 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }
        self.inner.read(buf)
    }
}

impl Seek for Failing {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_io_error_stops_the_search() {
    let source = Failing {
        inner: Cursor::new(b"ACGT\nACGT\nACGT\n".to_vec()),
    };
    // one byte buffer: the first line needs several reads
    let reader = BufReader::with_capacity(1, source);
    let err = formats::sniff(reader, None, None).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)), "{:?}", err);
}
