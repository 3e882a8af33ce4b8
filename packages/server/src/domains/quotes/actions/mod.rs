//! Quote workflow actions - business logic functions
//!
//! The competing-bids sub-workflow: providers submit and send bids,
//! managers approve or reject them, providers may withdraw a pending bid.
//! Approval is the mutual-exclusion point - one transaction accepts the
//! winner, moves the intervention to scheduling and rejects every open
//! competitor.

mod approve;
mod cancel;
mod reject;
mod send;
mod submit;

pub use approve::{approve_quote, ApproveQuote};
pub use cancel::{cancel_quote, CancelQuote};
pub use reject::{reject_quote, RejectQuote};
pub use send::{send_quote, SendQuote};
pub use submit::{submit_quote, SubmitQuote};
