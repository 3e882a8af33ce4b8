//! Quotes domain - the competing-bids workflow
//!
//! At most one quote per intervention is ever accepted; approval, the
//! intervention transition and competitor rejection commit together.

pub mod actions;
pub mod effects;
pub mod events;
pub mod models;

// Re-export commonly used types
pub use models::{Quote, QuoteStatus};
