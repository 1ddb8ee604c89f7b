use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single assembled sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    /// Sequence identifier (first word of the FASTA definition line)
    pub name: String,

    /// Residues, stored exactly as read (case is preserved)
    #[serde(skip)]
    pub sequence: Vec<u8>,
}

impl Contig {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Return a copy of this contig carrying a different sequence
    #[must_use]
    pub fn with_sequence(&self, sequence: Vec<u8>) -> Self {
        Self {
            name: self.name.clone(),
            sequence,
        }
    }

    /// Return a copy of this contig under a different name
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: self.sequence.clone(),
        }
    }
}

/// An ordered collection of contigs with unique names.
///
/// Input order is preserved so intermediate files list contigs the way they
/// were read. Every pipeline stage returns a new set rather than mutating the
/// one it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigSet {
    contigs: Vec<Contig>,
    name_to_index: HashMap<String, usize>,
}

impl ContigSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contig, returning it back if the name is already taken
    ///
    /// # Errors
    ///
    /// Returns the rejected contig when a contig with the same name exists.
    pub fn insert(&mut self, contig: Contig) -> Result<(), Contig> {
        if self.name_to_index.contains_key(&contig.name) {
            return Err(contig);
        }
        self.name_to_index
            .insert(contig.name.clone(), self.contigs.len());
        self.contigs.push(contig);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Contig> {
        self.name_to_index.get(name).map(|&i| &self.contigs[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contigs.iter().map(|c| c.name.as_str())
    }

    /// Total number of residues across all contigs
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.contigs.iter().map(Contig::len).sum()
    }
}

impl FromIterator<Contig> for ContigSet {
    /// Collect contigs, keeping the first occurrence of a repeated name
    fn from_iter<I: IntoIterator<Item = Contig>>(iter: I) -> Self {
        let mut set = Self::new();
        for contig in iter {
            let _ = set.insert(contig);
        }
        set
    }
}

impl IntoIterator for ContigSet {
    type Item = Contig;
    type IntoIter = std::vec::IntoIter<Contig>;

    fn into_iter(self) -> Self::IntoIter {
        self.contigs.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContigSet {
    type Item = &'a Contig;
    type IntoIter = std::slice::Iter<'a, Contig>;

    fn into_iter(self) -> Self::IntoIter {
        self.contigs.iter()
    }
}
