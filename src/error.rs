//! Error types for the ERC-20 session
//!
//! Uses `eyre` for ergonomic error handling with context. Failed actions are
//! flattened into a single message with [`describe`] before they land in the
//! session state.

pub use eyre::{eyre, Context, Report, Result};

/// Render an error and its context chain on one line
pub fn describe(err: &Report) -> String {
    format!("{:#}", err)
}
