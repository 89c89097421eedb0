//! Plain-text sequence lists
//!
//! One sequence per line, optionally preceded by a label:
//!
//! ```text
//! # heavy chain CDR3 loops
//! 1abc_H3 CARDYW
//! CAKDYW
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A line holding a
//! single token is labelled with the sequence itself.

use crate::core::{Result, SSKError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labelled sequences in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSet {
    labels: Vec<String>,
    sequences: Vec<String>,
}

impl SequenceSet {
    /// Load a sequence list from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SSKError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a sequence list from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut set = Self::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(SSKError::IoError)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [sequence] => set.push(*sequence, *sequence),
                [label, sequence] => set.push(*label, *sequence),
                _ => {
                    return Err(SSKError::ParseError(format!(
                        "Line {}: expected 'sequence' or 'label sequence', found {} fields",
                        line_no + 1,
                        fields.len()
                    )))
                }
            }
        }

        Ok(set)
    }

    /// Build a set labelled by the sequences themselves
    pub fn from_sequences<S: AsRef<str>>(sequences: &[S]) -> Self {
        let mut set = Self::default();
        for s in sequences {
            set.push(s.as_ref(), s.as_ref());
        }
        set
    }

    /// Append a labelled sequence
    pub fn push(&mut self, label: impl Into<String>, sequence: impl Into<String>) {
        self.labels.push(label.into());
        self.sequences.push(sequence.into());
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
