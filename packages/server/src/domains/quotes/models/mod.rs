pub mod quote;

pub use quote::{Quote, QuoteStatus, SUPERSEDED_REASON};
