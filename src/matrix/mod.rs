//! Kernel matrices and their construction

pub mod builder;
pub mod dense;

pub use self::builder::*;
pub use self::dense::*;
