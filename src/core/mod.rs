//! Core types and errors for string kernel computation

pub mod alphabet;
pub mod error;
pub mod types;

pub use self::error::*;
pub use self::types::*;
