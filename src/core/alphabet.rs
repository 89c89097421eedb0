//! Alphabet handling for soft matching
//!
//! Substitution tables are indexed by the offset of an uppercase ASCII letter
//! from `'A'`, which gives the 26 symbols covering the standard amino acid
//! one-letter codes plus the ambiguity codes (B, J, O, U, X, Z).

use crate::core::{Result, SSKError};

/// Number of symbols in the substitution alphabet (A-Z)
pub const ALPHABET_SIZE: usize = 26;

/// Map an uppercase ASCII letter to its table offset
pub fn letter_index(symbol: u8) -> Option<usize> {
    if symbol.is_ascii_uppercase() {
        Some((symbol - b'A') as usize)
    } else {
        None
    }
}

/// Check that every byte of `sequence` is an uppercase letter
pub fn validate_sequence(sequence: &str) -> Result<()> {
    match sequence.bytes().position(|b| letter_index(b).is_none()) {
        None => Ok(()),
        Some(position) => Err(SSKError::InvalidSymbol {
            symbol: sequence[position..].chars().next().unwrap_or('?'),
            position,
            sequence: sequence.to_string(),
        }),
    }
}

/// Check a whole set of sequences, failing on the first offending one
pub fn validate_sequences<S: AsRef<str>>(sequences: &[S]) -> Result<()> {
    sequences
        .iter()
        .try_for_each(|s| validate_sequence(s.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_index() {
        assert_eq!(letter_index(b'A'), Some(0));
        assert_eq!(letter_index(b'Z'), Some(25));
        assert_eq!(letter_index(b'a'), None);
        assert_eq!(letter_index(b'*'), None);
    }

    #[test]
    fn test_validate_sequence() {
        assert!(validate_sequence("CARDYW").is_ok());
        assert!(validate_sequence("").is_ok());

        match validate_sequence("CAr") {
            Err(SSKError::InvalidSymbol {
                symbol, position, ..
            }) => {
                assert_eq!(symbol, 'r');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidSymbol, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_sequences_reports_first_error() {
        let sequences = vec!["GAB", "GA-B", "x"];
        let err = validate_sequences(&sequences).unwrap_err();
        assert!(matches!(err, SSKError::InvalidSymbol { position: 2, .. }));
    }
}
