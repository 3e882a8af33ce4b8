pub mod expo;

pub use expo::*;
