//! Sequence input and kernel matrix output

pub mod csv;
pub mod sequences;

pub use self::csv::*;
pub use self::sequences::*;
