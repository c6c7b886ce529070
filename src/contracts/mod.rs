//! Contract bindings for ERC-20 tokens

pub mod token;

pub use token::*;
