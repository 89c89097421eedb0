//! Error types for string kernel computation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SSKError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid symbol {symbol:?} at position {position} of sequence {sequence:?}: soft matching expects uppercase letters A-Z")]
    InvalidSymbol {
        symbol: char,
        position: usize,
        sequence: String,
    },

    #[error("Empty input: at least one sequence is required")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SSKError>;
