//! Substitution models for soft matching
//!
//! A substitution model is a 26x26 table of similarity scores between
//! uppercase letters, flattened row-major. Under soft matching every aligned
//! character pair contributes `score(a, b)` instead of the 0/1 identity test.

use crate::core::alphabet::{letter_index, ALPHABET_SIZE};
use crate::core::{Result, SSKError};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Number of entries in a substitution table
pub const TABLE_SIZE: usize = ALPHABET_SIZE * ALPHABET_SIZE;

/// Letter-by-letter similarity table used for soft matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SubstitutionTable", into = "SubstitutionTable")]
pub struct SubstitutionModel {
    name: String,
    scores: Vec<f64>,
}

/// Serialized form of a substitution model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionTable {
    pub name: String,
    /// Row-major scores, row = first letter, column = second letter
    pub scores: Vec<f64>,
}

impl SubstitutionModel {
    /// Build a model from a flattened 26x26 table
    ///
    /// # Errors
    /// Returns an error if the table does not have 676 entries or contains
    /// non-finite values.
    pub fn from_table(name: impl Into<String>, scores: Vec<f64>) -> Result<Self> {
        if scores.len() != TABLE_SIZE {
            return Err(SSKError::DimensionMismatch {
                expected: TABLE_SIZE,
                actual: scores.len(),
            });
        }
        if let Some(pos) = scores.iter().position(|s| !s.is_finite()) {
            return Err(SSKError::InvalidParameter(format!(
                "Substitution score at entry {pos} is not finite"
            )));
        }
        Ok(Self {
            name: name.into(),
            scores,
        })
    }

    /// Build a model by evaluating `score` on every pair of letters
    pub fn from_fn<F>(name: impl Into<String>, score: F) -> Self
    where
        F: Fn(u8, u8) -> f64,
    {
        let mut scores = Vec::with_capacity(TABLE_SIZE);
        for a in b'A'..=b'Z' {
            for b in b'A'..=b'Z' {
                scores.push(score(a, b));
            }
        }
        Self {
            name: name.into(),
            scores,
        }
    }

    /// Identity model: soft matching with it reproduces hard matching
    pub fn identity() -> Self {
        Self::from_fn("identity", |a, b| if a == b { 1.0 } else { 0.0 })
    }

    /// Score of the letter pair `(a, b)`
    ///
    /// Bytes outside `A..=Z` score 0. Entry points that accept user input
    /// reject such sequences before the kernel runs.
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> f64 {
        match (letter_index(a), letter_index(b)) {
            (Some(i), Some(j)) => self.scores[i * ALPHABET_SIZE + j],
            _ => 0.0,
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `score(a, b) == score(b, a)` for all letters
    pub fn is_symmetric(&self) -> bool {
        (0..ALPHABET_SIZE).all(|i| {
            (i + 1..ALPHABET_SIZE)
                .all(|j| self.scores[i * ALPHABET_SIZE + j] == self.scores[j * ALPHABET_SIZE + i])
        })
    }
}

impl TryFrom<SubstitutionTable> for SubstitutionModel {
    type Error = SSKError;

    fn try_from(table: SubstitutionTable) -> Result<Self> {
        Self::from_table(table.name, table.scores)
    }
}

impl From<SubstitutionModel> for SubstitutionTable {
    fn from(model: SubstitutionModel) -> Self {
        Self {
            name: model.name,
            scores: model.scores,
        }
    }
}
