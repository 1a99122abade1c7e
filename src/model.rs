//! Data model for parsed sequence files.
//!
//! A file is read into a [`SeqList`]: an ordered collection of [`Sequence`]
//! values, each carrying its optional name and description, its residues and
//! the alphabet the residues were validated against.

use std::ops::Index;

use crate::alphabet::Alphabet;

/// A single named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence identifier, when the format provides one
    pub name: Option<String>,
    /// Free text description (FASTA header, NBRF title line, ...)
    pub description: Option<String>,
    /// The residues, exactly as read (no case folding)
    pub data: String,
    /// Alphabet the residues belong to
    pub alphabet: Alphabet,
}

impl Sequence {
    /// Creates a named sequence over the generic alphabet.
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            data: data.into(),
            alphabet: Alphabet::Generic,
        }
    }

    /// Creates a sequence with no name.
    pub fn unnamed(data: impl Into<String>) -> Self {
        Self {
            name: None,
            description: None,
            data: data.into(),
            alphabet: Alphabet::Generic,
        }
    }

    /// Sets the description. Empty descriptions are stored as `None`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the name, or the empty string for unnamed sequences.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Gets a slice of the sequence data, clamped to the sequence length.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let start = start.min(self.data.len());
        let end = end.min(self.data.len()).max(start);
        self.data.get(start..end).unwrap_or("")
    }
}

/// An ordered collection of sequences, as read from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqList {
    /// All sequences, in file order
    pub sequences: Vec<Sequence>,
}

impl SeqList {
    /// Creates a collection from a vector of sequences.
    pub fn new(sequences: Vec<Sequence>) -> Self {
        Self { sequences }
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the length of the longest sequence.
    pub fn alignment_length(&self) -> usize {
        self.sequences.iter().map(Sequence::len).max().unwrap_or(0)
    }

    /// True when every sequence has the same length.
    pub fn is_aligned(&self) -> bool {
        match self.sequences.first() {
            Some(first) => self.sequences.iter().all(|s| s.len() == first.len()),
            None => true,
        }
    }

    /// Returns the maximum name length (for column layout).
    pub fn max_name_length(&self) -> usize {
        self.sequences
            .iter()
            .map(|s| s.name_or_empty().len())
            .max()
            .unwrap_or(0)
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }
}

impl Index<usize> for SeqList {
    type Output = Sequence;

    fn index(&self, index: usize) -> &Sequence {
        &self.sequences[index]
    }
}

impl<'a> IntoIterator for &'a SeqList {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

impl IntoIterator for SeqList {
    type Item = Sequence;
    type IntoIter = std::vec::IntoIter<Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.into_iter()
    }
}

impl FromIterator<Sequence> for SeqList {
    fn from_iter<I: IntoIterator<Item = Sequence>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_creation() {
        let seq = Sequence::new("seq1", "ACGT");
        assert_eq!(seq.name.as_deref(), Some("seq1"));
        assert_eq!(seq.data, "ACGT");
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.alphabet, Alphabet::Generic);
    }

    #[test]
    fn test_empty_description_is_none() {
        let seq = Sequence::new("seq1", "ACGT").with_description("");
        assert_eq!(seq.description, None);
        let seq = seq.with_description("a title");
        assert_eq!(seq.description.as_deref(), Some("a title"));
    }

    #[test]
    fn test_slice_is_clamped() {
        let seq = Sequence::unnamed("ACGTACGT");
        assert_eq!(seq.slice(2, 5), "GTA");
        assert_eq!(seq.slice(6, 60), "GT");
        assert_eq!(seq.slice(60, 120), "");
    }

    #[test]
    fn test_aligned_collection() {
        let seqs = SeqList::new(vec![
            Sequence::new("seq1", "ACGT"),
            Sequence::new("seq2", "TGCA"),
        ]);
        assert!(seqs.is_aligned());
        assert_eq!(seqs.alignment_length(), 4);
        assert_eq!(seqs[1].name.as_deref(), Some("seq2"));
    }

    #[test]
    fn test_unaligned_collection() {
        let seqs: SeqList = vec![Sequence::new("seq1", "ACGT"), Sequence::new("s2", "TG")]
            .into_iter()
            .collect();
        assert!(!seqs.is_aligned());
        assert_eq!(seqs.alignment_length(), 4);
        assert_eq!(seqs.max_name_length(), 4);
    }

    #[test]
    fn test_empty_collection() {
        let seqs = SeqList::default();
        assert!(seqs.is_empty());
        assert!(seqs.is_aligned());
        assert_eq!(seqs.alignment_length(), 0);
        assert!(seqs.get(0).is_none());
    }
}
